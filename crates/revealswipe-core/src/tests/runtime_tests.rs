use super::*;
use crate::platform::DefaultScheduler;
use std::cell::Cell;

fn runtime_with_scheduler() -> (Runtime, Arc<DefaultScheduler>) {
    let scheduler = Arc::new(DefaultScheduler::new());
    (Runtime::new(scheduler.clone()), scheduler)
}

#[test]
fn frame_callbacks_run_once_with_frame_time() {
    let (runtime, scheduler) = runtime_with_scheduler();
    let seen = Rc::new(Cell::new(None));
    let sink = Rc::clone(&seen);

    let registration = runtime
        .frame_clock()
        .with_frame_nanos(move |time| sink.set(Some(time)));
    assert!(registration.is_active());
    assert!(scheduler.take_frame_request());
    assert!(runtime.needs_frame());

    runtime.drain_frame_callbacks(16_000_000);
    assert_eq!(seen.get(), Some(16_000_000));
    assert!(!runtime.has_frame_callbacks());
    assert!(!runtime.needs_frame());

    seen.set(None);
    runtime.drain_frame_callbacks(32_000_000);
    assert_eq!(seen.get(), None);
}

#[test]
fn dropping_registration_cancels_callback() {
    let (runtime, _) = runtime_with_scheduler();
    let fired = Rc::new(Cell::new(false));
    let sink = Rc::clone(&fired);

    let registration = runtime
        .frame_clock()
        .with_frame_nanos(move |_| sink.set(true));
    drop(registration);

    runtime.drain_frame_callbacks(1);
    assert!(!fired.get());
}

/// Wakes itself and stays pending on the first poll.
struct YieldOnce {
    yielded: bool,
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

#[test]
fn woken_task_requests_a_frame_and_finishes_on_next_poll() {
    let (runtime, scheduler) = runtime_with_scheduler();
    let handle = runtime.handle();
    let finished = Rc::new(Cell::new(false));
    let sink = Rc::clone(&finished);

    let task = handle.spawn_ui(async move {
        YieldOnce { yielded: false }.await;
        sink.set(true);
    });
    assert!(task.is_some());
    assert!(runtime.has_pending_tasks());
    scheduler.take_frame_request();

    assert!(!runtime.poll_tasks());
    assert!(scheduler.take_frame_request());
    assert!(!finished.get());

    assert!(runtime.poll_tasks());
    assert!(finished.get());
    assert!(!runtime.has_pending_tasks());
}

#[test]
fn cancelled_task_never_completes() {
    let (runtime, _) = runtime_with_scheduler();
    let handle = runtime.handle();
    let clock = runtime.frame_clock();
    let finished = Rc::new(Cell::new(false));
    let sink = Rc::clone(&finished);

    let task = handle
        .spawn_ui(async move {
            let registration = clock.with_frame_nanos(move |_| sink.set(true));
            std::future::pending::<()>().await;
            drop(registration);
        })
        .expect("runtime alive");
    runtime.poll_tasks();
    assert!(runtime.has_frame_callbacks());
    task.cancel();

    assert!(!runtime.has_pending_tasks());
    // The dropped future released its frame registration.
    assert!(!runtime.has_frame_callbacks());
    runtime.drain_frame_callbacks(1);
    runtime.poll_tasks();
    assert!(!finished.get());
}

#[test]
fn task_cancelled_by_sibling_during_poll_is_dropped() {
    let (runtime, _) = runtime_with_scheduler();
    let handle = runtime.handle();
    let victim_id = Rc::new(Cell::new(0));
    let victim_polls = Rc::new(Cell::new(0));

    let id_for_killer = Rc::clone(&victim_id);
    let killer_handle = handle.clone();
    handle
        .spawn_ui(async move {
            killer_handle.cancel_task(id_for_killer.get());
        })
        .expect("runtime alive");

    let polls = Rc::clone(&victim_polls);
    let victim = handle
        .spawn_ui(async move {
            polls.set(polls.get() + 1);
            std::future::pending::<()>().await;
            polls.set(polls.get() + 1);
        })
        .expect("runtime alive");
    victim_id.set(victim.id());

    runtime.poll_tasks();
    assert_eq!(victim_polls.get(), 0);
    assert!(!runtime.has_pending_tasks());
}

#[test]
fn handle_outliving_runtime_is_inert() {
    let (runtime, _) = runtime_with_scheduler();
    let handle = runtime.handle();
    drop(runtime);

    assert!(handle.spawn_ui(async {}).is_none());
    assert!(handle.register_frame_callback(|_| {}).is_none());
    assert!(!handle.has_frame_callbacks());
}
