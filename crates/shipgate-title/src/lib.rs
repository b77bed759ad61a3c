mod error;
mod parse;
mod policy;

pub use error::{ParseError, PolicyConfigError, PolicyViolation, TitleError};
pub use parse::{ChangeRequestTitle, classify, label_for, parse_title};
pub use policy::{DEFAULT_ALLOWED_TYPES, TitlePolicy, TitlePolicyBuilder};
