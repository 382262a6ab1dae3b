//! Testing utilities and harness for RevealSwipe

pub mod robot;
pub mod robot_assertions;

pub use robot::*;
pub use robot_assertions::*;

pub mod prelude {
    pub use crate::robot::*;
    pub use crate::robot_assertions::*;
}
