//! Rule inference from header text.

mod headers;

pub use headers::HeaderRuleInferer;
