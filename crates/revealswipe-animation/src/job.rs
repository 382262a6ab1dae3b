use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll, Waker};

static NEXT_JOB_ID: AtomicU64 = AtomicU64::new(1);

/// How an animation ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationOutcome {
    /// The value reached its target.
    Finished,
    /// Another animation, snap or drag took over, or the job was cancelled.
    Cancelled,
}

type CompletionListener = Box<dyn FnOnce(AnimationOutcome)>;

struct JobShared {
    id: u64,
    outcome: Cell<Option<AnimationOutcome>>,
    waker: RefCell<Option<Waker>>,
    listeners: RefCell<SmallVec<[CompletionListener; 1]>>,
    canceller: RefCell<Option<Box<dyn FnOnce()>>>,
}

/// Handle to one running (or finished) animation.
///
/// Awaiting the job yields its [`AnimationOutcome`]. Dropping the handle does
/// not stop the animation; call [`AnimationJob::cancel`] for that.
#[derive(Clone)]
pub struct AnimationJob {
    shared: Rc<JobShared>,
}

impl AnimationJob {
    pub(crate) fn pending() -> Self {
        Self {
            shared: Rc::new(JobShared {
                id: NEXT_JOB_ID.fetch_add(1, Ordering::Relaxed),
                outcome: Cell::new(None),
                waker: RefCell::new(None),
                listeners: RefCell::new(SmallVec::new()),
                canceller: RefCell::new(None),
            }),
        }
    }

    /// A job that already reached its target, for zero-distance or zero-duration moves.
    pub fn finished() -> Self {
        let job = Self::pending();
        job.shared.outcome.set(Some(AnimationOutcome::Finished));
        job
    }

    pub fn id(&self) -> u64 {
        self.shared.id
    }

    pub fn is_complete(&self) -> bool {
        self.shared.outcome.get().is_some()
    }

    pub fn outcome(&self) -> Option<AnimationOutcome> {
        self.shared.outcome.get()
    }

    /// Stops the animation where it is. No-op once the job completed.
    pub fn cancel(&self) {
        if self.is_complete() {
            return;
        }
        let canceller = self.shared.canceller.borrow_mut().take();
        match canceller {
            Some(cancel) => cancel(),
            None => self.resolve(AnimationOutcome::Cancelled),
        }
    }

    /// Runs `listener` once the job completes, or right away if it already has.
    pub fn on_complete(&self, listener: impl FnOnce(AnimationOutcome) + 'static) {
        match self.shared.outcome.get() {
            Some(outcome) => listener(outcome),
            None => self.shared.listeners.borrow_mut().push(Box::new(listener)),
        }
    }

    pub(crate) fn set_canceller(&self, canceller: impl FnOnce() + 'static) {
        *self.shared.canceller.borrow_mut() = Some(Box::new(canceller));
    }

    /// First resolution wins; later calls are ignored.
    pub(crate) fn resolve(&self, outcome: AnimationOutcome) {
        if self.shared.outcome.get().is_some() {
            return;
        }
        self.shared.outcome.set(Some(outcome));
        self.shared.canceller.borrow_mut().take();
        let listeners = std::mem::take(&mut *self.shared.listeners.borrow_mut());
        let waker = self.shared.waker.borrow_mut().take();
        for listener in listeners {
            listener(outcome);
        }
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl Future for AnimationJob {
    type Output = AnimationOutcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.shared.outcome.get() {
            Some(outcome) => Poll::Ready(outcome),
            None => {
                *self.shared.waker.borrow_mut() = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

impl fmt::Debug for AnimationJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationJob")
            .field("id", &self.shared.id)
            .field("outcome", &self.shared.outcome.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_task::noop_waker_ref;

    #[test]
    fn finished_job_is_ready_immediately() {
        let mut job = AnimationJob::finished();
        let mut cx = Context::from_waker(noop_waker_ref());
        assert_eq!(
            Pin::new(&mut job).poll(&mut cx),
            Poll::Ready(AnimationOutcome::Finished)
        );
    }

    #[test]
    fn listeners_run_once_on_first_resolution() {
        let job = AnimationJob::pending();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        job.on_complete(move |outcome| sink.borrow_mut().push(outcome));

        job.resolve(AnimationOutcome::Cancelled);
        job.resolve(AnimationOutcome::Finished);

        assert_eq!(*seen.borrow(), vec![AnimationOutcome::Cancelled]);
        assert_eq!(job.outcome(), Some(AnimationOutcome::Cancelled));
    }

    #[test]
    fn listener_added_after_completion_runs_immediately() {
        let job = AnimationJob::finished();
        let ran = Rc::new(Cell::new(false));
        let sink = Rc::clone(&ran);
        job.on_complete(move |_| sink.set(true));
        assert!(ran.get());
    }

    #[test]
    fn cancel_without_canceller_resolves_cancelled() {
        let mut job = AnimationJob::pending();
        let mut cx = Context::from_waker(noop_waker_ref());
        assert!(Pin::new(&mut job).poll(&mut cx).is_pending());

        job.cancel();

        assert_eq!(
            Pin::new(&mut job).poll(&mut cx),
            Poll::Ready(AnimationOutcome::Cancelled)
        );
    }
}
