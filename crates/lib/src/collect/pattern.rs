//! File name wildcard matching (`*` and `?`).

/// Returns true if `name` matches `pattern` in full.
///
/// `*` matches any run of characters (including none) and `?` matches exactly one.
/// There are no character classes and no path separators are special, since
/// patterns are only ever applied to a single file name.
pub fn matches(pattern: &str, name: &str) -> bool {
  let pattern: Vec<char> = pattern.chars().collect();
  let name: Vec<char> = name.chars().collect();

  let (mut p, mut n) = (0, 0);
  // Position of the last `*` seen and the name index it was tried against
  let mut backtrack: Option<(usize, usize)> = None;

  while n < name.len() {
    match pattern.get(p) {
      Some('*') => {
        backtrack = Some((p, n));
        p += 1;
      }
      Some('?') => {
        p += 1;
        n += 1;
      }
      Some(c) if *c == name[n] => {
        p += 1;
        n += 1;
      }
      _ => match backtrack {
        Some((star, matched)) => {
          p = star + 1;
          n = matched + 1;
          backtrack = Some((star, matched + 1));
        }
        None => return false,
      },
    }
  }

  pattern[p..].iter().all(|c| *c == '*')
}
