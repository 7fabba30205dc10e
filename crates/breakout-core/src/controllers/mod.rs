//! Per-tick controllers that write velocities onto bodies.
//!
//! - [`PaddleController`]: turns move-left / move-right / stop commands into
//!   paddle velocity
//! - [`BallController`]: keeps both ball velocity components above a minimum
//!   magnitude
//!
//! Controllers hold no entity references. Each tick they query the arena by
//! kind and write through [`Arena::set_linear_velocity`](crate::arena::Arena::set_linear_velocity).

mod ball;
mod paddle;

pub use ball::{clamp_velocity, BallController};
pub use paddle::{PaddleCommand, PaddleController, PaddleState};
