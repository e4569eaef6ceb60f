/// Failures that prevent a parse from starting.
///
/// Malformed source never produces an error; syntax errors become `ERROR`
/// nodes in the tree.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("input is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("input of {0} bytes exceeds the 4 GiB limit")]
    InputTooLarge(usize),
}
