use xi_rope::Rope;

/// A single line of the rope with its 1-based line number.
#[derive(Debug, Clone)]
pub struct LineRef {
    pub number: usize,
    /// Line text including its newline, if any.
    pub text: String,
}

/// Returns an iterator over the rope's lines, numbered from 1.
///
/// Uses `lines_raw` so that `\r\n` endings survive until classification
/// strips them.
pub fn lines_with_numbers(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    rope.lines_raw(..).enumerate().map(|(i, line)| LineRef {
        number: i + 1,
        text: line.into_owned(),
    })
}
