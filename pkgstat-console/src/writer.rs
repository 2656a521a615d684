use std::io;

use console::Term;

pub fn gen_prefix(prefix: &str, prefix_len: u16) -> String {
    // Keep at least one column between the prefix and the message
    let width = console::measure_text_width(prefix);
    let left_padding_size = (prefix_len as usize).saturating_sub(width + 1);

    let mut real_prefix: String = " ".repeat(left_padding_size);
    real_prefix.push_str(prefix);
    real_prefix.push(' ');
    real_prefix
}

/// Split `msg` into lines no wider than `max_len` columns
pub(crate) fn wrap(msg: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    let mut res = vec![];

    for line in msg.lines() {
        let mut cur = String::new();
        let mut cur_len = 0;

        for c in line.chars() {
            let mut tmp = [0u8; 4];
            let c_len = console::measure_text_width(c.encode_utf8(&mut tmp));
            if cur_len + c_len > max_len && !cur.is_empty() {
                res.push(std::mem::take(&mut cur));
                cur_len = 0;
            }
            cur.push(c);
            cur_len += c_len;
        }

        res.push(cur);
    }

    if res.is_empty() {
        res.push(String::new());
    }

    res
}

pub struct Writer {
    term: Term,
    prefix_len: u16,
}

impl Default for Writer {
    fn default() -> Self {
        Writer {
            term: Term::stderr(),
            prefix_len: 10,
        }
    }
}

impl Writer {
    pub fn get_max_len(&self) -> u16 {
        let len = self
            .term
            .size_checked()
            .unwrap_or((25, 80))
            .1
            .saturating_sub(self.prefix_len);

        len.clamp(20, 150)
    }

    fn write_prefix(&self, prefix: &str) -> io::Result<()> {
        self.term.write_str(&gen_prefix(prefix, self.prefix_len))
    }

    /// Write `msg` after `prefix`, continuation lines are indented to line up with the first
    pub fn writeln(&self, prefix: &str, msg: &str) -> io::Result<()> {
        for (i, line) in wrap(msg, self.get_max_len().into()).iter().enumerate() {
            self.write_prefix(if i == 0 { prefix } else { "" })?;
            self.term.write_line(line)?;
        }

        Ok(())
    }
}

#[test]
fn test_gen_prefix() {
    assert_eq!(gen_prefix("INFO", 10), "     INFO ");
    assert_eq!(gen_prefix("", 10), "          ");
    assert_eq!(gen_prefix("WARNING", 10), "  WARNING ");
    assert_eq!(gen_prefix("VERY LONG PREFIX", 10), "VERY LONG PREFIX ");
}

#[test]
fn test_wrap() {
    assert_eq!(wrap("abcdef", 4), vec!["abcd", "ef"]);
    assert_eq!(wrap("ab\ncd", 4), vec!["ab", "cd"]);
    assert_eq!(wrap("", 4), vec![""]);
    assert_eq!(wrap("abcd", 4), vec!["abcd"]);
}
