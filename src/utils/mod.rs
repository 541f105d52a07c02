mod response_util;
mod session_util;
mod string_util;

pub use response_util::*;
pub use session_util::*;
pub use string_util::*;
