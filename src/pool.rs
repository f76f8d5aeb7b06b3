//! Thread-local parser pooling.
//!
//! Each thread lazily creates one C# parser and reuses it for every document
//! it parses afterwards.

use crate::ts::{CSharpParser, TreeSitterError};
use std::cell::RefCell;

thread_local! {
    static CSHARP_PARSER: RefCell<Option<CSharpParser>> = const { RefCell::new(None) };
}

/// Execute function with pooled parser instance.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use marker_sweep::pool::with_parser;
///
/// let tree = with_parser(|parser| parser.parse("class A { }"))??;
/// # Ok(())
/// # }
/// ```
pub fn with_parser<F, R>(f: F) -> Result<R, TreeSitterError>
where
    F: FnOnce(&mut CSharpParser) -> R,
{
    CSHARP_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        let parser = match slot.take() {
            Some(parser) => parser,
            None => CSharpParser::new()?,
        };
        Ok(f(slot.insert(parser)))
    })
}
