pub mod movie;
pub mod validation;
pub mod watched;

pub use movie::{MovieDetail, MovieSummary};
pub use validation::{NumberValidator, StringValidator, ValidationError, Validator};
pub use watched::{WatchedMovie, WatchedSummary};
