//! Line splitting for request bodies.

/// Iterator over the lines of a body.
///
/// A line ends at `\n`, `\r\n` or a lone `\r`. Terminators are not part of
/// the yielded slice, and a trailing terminator does not start a new line.
#[derive(Debug, Clone)]
pub struct BodyLines<'a> {
    rest: &'a [u8],
}

impl<'a> BodyLines<'a> {
    pub fn new(body: &'a [u8]) -> Self {
        Self { rest: body }
    }
}

impl<'a> Iterator for BodyLines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let rest = self.rest;
        match rest.iter().position(|b| *b == b'\n' || *b == b'\r') {
            Some(end) => {
                let mut next = end + 1;
                if rest[end] == b'\r' && rest.get(next) == Some(&b'\n') {
                    next += 1;
                }
                self.rest = &rest[next..];
                Some(&rest[..end])
            }
            None => {
                self.rest = &[];
                Some(rest)
            }
        }
    }
}
