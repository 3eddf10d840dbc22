//! Splitting of the index text into records.
//!
//! Records are blocks of `K:V` lines terminated by a blank line. The
//! tokenizer reads one line at a time, so memory use is bounded by the size of
//! the largest record rather than by the size of the index.

use std::io::{BufRead, Read};

use super::error::IndexError;

/// Upper bound on a single record.
///
/// Real records are a few hundred bytes; anything near this size means the
/// stream is not an index.
pub const MAX_RECORD_SIZE: usize = 1024 * 1024;

/// Forward-only iterator over the raw records of an index stream.
///
/// Each item is the record's bytes without the blank-line terminator (the
/// newline ending its last field line is dropped as well). Blank lines
/// between records are skipped, so empty records are never yielded. A final
/// record without a terminator is yielded as-is once the stream ends.
pub struct Records<R> {
    reader: R,
    line: Vec<u8>,
    done: bool,
}

impl<R: BufRead> Records<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            done: false,
        }
    }

    fn next_record(&mut self) -> Result<Option<Vec<u8>>, IndexError> {
        let mut record = Vec::new();

        loop {
            self.line.clear();
            // One byte past the limit is enough to tell an oversized record.
            let budget = (MAX_RECORD_SIZE - record.len()) as u64 + 1;
            let n = (&mut self.reader)
                .take(budget)
                .read_until(b'\n', &mut self.line)
                .map_err(IndexError::from_decode)?;

            if n == 0 {
                // End of stream: flush whatever is pending.
                self.done = true;
                return Ok((!record.is_empty()).then_some(record));
            }

            if self.line == b"\n" {
                if record.is_empty() {
                    continue;
                }
                record.pop();
                return Ok(Some(record));
            }

            if record.len() + self.line.len() > MAX_RECORD_SIZE {
                self.done = true;
                return Err(IndexError::RecordTooLarge {
                    limit: MAX_RECORD_SIZE,
                });
            }
            record.extend_from_slice(&self.line);
        }
    }
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = Result<Vec<u8>, IndexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn collect(input: &[u8]) -> Vec<Vec<u8>> {
        Records::new(input)
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[rstest]
    #[case(b"", &[])]
    #[case(b"\n\n", &[])]
    #[case(b"P:a\nV:1\n\n", &[b"P:a\nV:1" as &[u8]])]
    #[case(b"P:a\nV:1\n\nP:b\nV:2\n\n", &[b"P:a\nV:1" as &[u8], b"P:b\nV:2"])]
    #[case(b"P:a\n\nP:b\nV:2", &[b"P:a" as &[u8], b"P:b\nV:2"])] // unterminated tail
    #[case(b"P:a\n\nP:b\n", &[b"P:a" as &[u8], b"P:b\n"])] // tail missing blank line
    #[case(b"P:a\n\n\n\nP:b\n\n", &[b"P:a" as &[u8], b"P:b"])] // extra blank lines
    fn splits_on_blank_lines(#[case] input: &[u8], #[case] expected: &[&[u8]]) {
        let records = collect(input);
        let expected: Vec<Vec<u8>> = expected.iter().map(|r| r.to_vec()).collect();
        assert_eq!(records, expected);
    }

    #[test]
    fn oversized_record_fails_once() {
        let mut input = Vec::new();
        for _ in 0..(MAX_RECORD_SIZE / 16 + 1) {
            input.extend_from_slice(b"D:abcdefghijklm\n");
        }

        let mut records = Records::new(&input[..]);
        assert!(matches!(
            records.next(),
            Some(Err(IndexError::RecordTooLarge { .. }))
        ));
        assert!(records.next().is_none());
    }

    #[test]
    fn oversized_line_is_not_buffered_whole() {
        let data = vec![b'x'; 8 * MAX_RECORD_SIZE];
        let mut input = &data[..];

        let mut records = Records::new(&mut input);
        assert!(matches!(
            records.next(),
            Some(Err(IndexError::RecordTooLarge { .. }))
        ));
        drop(records);

        // Reading stopped right after the limit.
        assert_eq!(input.len(), data.len() - MAX_RECORD_SIZE - 1);
    }

    #[test]
    fn record_of_exactly_the_limit_is_accepted() {
        let mut data = vec![b'x'; MAX_RECORD_SIZE - 1];
        data.extend_from_slice(b"\n\nP:b\n");

        let records = collect(&data);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].len(), MAX_RECORD_SIZE - 1);
    }

    #[test]
    fn is_lazy() {
        // Only the first record is consumed from the reader.
        let input: &[u8] = b"P:a\n\nP:b\n\n";
        let mut reader = std::io::BufReader::with_capacity(1, input);
        let mut records = Records::new(&mut reader);
        assert_eq!(records.next().unwrap().unwrap(), b"P:a");
        drop(records);

        let mut rest = String::new();
        std::io::Read::read_to_string(&mut reader, &mut rest).unwrap();
        assert_eq!(rest, "P:b\n\n");
    }
}
