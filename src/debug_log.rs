//! Tagged console output for debug builds
//!
//! Three fixed channels print an emoji tag followed by the given items. Nothing is
//! printed in release builds. The macros check `debug_assertions` of the calling
//! crate; the plain functions check it for this crate.
//!
//! ```
//! use jkds_utility::{log_debug, log_network};
//!
//! log_debug!("test", 1234);
//! log_network!(sep = ", ", end = "\n"; "GET", "/lookup");
//! ```

use std::fmt::Display;
use std::io::{self, Write};

pub const DEFAULT_SEPARATOR: &str = " ";
pub const DEFAULT_TERMINATOR: &str = "\n";

/// True when this crate was built with debug assertions
pub const ENABLED: bool = cfg!(debug_assertions);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Debug,
    Error,
    Network,
}

impl Channel {
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Debug => "🐞debug",
            Self::Error => "🪛error",
            Self::Network => "🛜network",
        }
    }
}

/// Formats one line: the tag and every item joined by `separator`, then `terminator`.
pub fn render(
    channel: Channel,
    items: &[&dyn Display],
    separator: &str,
    terminator: &str,
) -> String {
    let mut line = channel.tag().to_string();
    for item in items {
        line.push_str(separator);
        line.push_str(&item.to_string());
    }
    line.push_str(terminator);
    line
}

pub fn write_to<W: Write>(
    writer: &mut W,
    channel: Channel,
    items: &[&dyn Display],
    separator: &str,
    terminator: &str,
) -> io::Result<()> {
    writer.write_all(render(channel, items, separator, terminator).as_bytes())?;
    writer.flush()
}

/// Writes to stdout unconditionally. Prefer the macros or the channel functions.
#[doc(hidden)]
pub fn print(channel: Channel, items: &[&dyn Display], separator: &str, terminator: &str) {
    // A closed stdout is not worth failing the caller over
    let _ = write_to(&mut io::stdout().lock(), channel, items, separator, terminator);
}

pub fn debug(items: &[&dyn Display]) {
    if ENABLED {
        print(Channel::Debug, items, DEFAULT_SEPARATOR, DEFAULT_TERMINATOR);
    }
}

pub fn error(items: &[&dyn Display]) {
    if ENABLED {
        print(Channel::Error, items, DEFAULT_SEPARATOR, DEFAULT_TERMINATOR);
    }
}

pub fn network(items: &[&dyn Display]) {
    if ENABLED {
        print(Channel::Network, items, DEFAULT_SEPARATOR, DEFAULT_TERMINATOR);
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_channel {
    ($channel:ident, sep = $sep:expr, end = $end:expr; $($item:expr),+ $(,)?) => {
        if cfg!(debug_assertions) {
            $crate::debug_log::print(
                $crate::debug_log::Channel::$channel,
                &[$(&$item as &dyn ::std::fmt::Display),+],
                $sep,
                $end,
            );
        }
    };
    ($channel:ident, $($item:expr),+ $(,)?) => {
        $crate::__log_channel!(
            $channel,
            sep = $crate::debug_log::DEFAULT_SEPARATOR,
            end = $crate::debug_log::DEFAULT_TERMINATOR;
            $($item),+
        )
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)+) => { $crate::__log_channel!(Debug, $($arg)+) };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)+) => { $crate::__log_channel!(Error, $($arg)+) };
}

#[macro_export]
macro_rules! log_network {
    ($($arg:tt)+) => { $crate::__log_channel!(Network, $($arg)+) };
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Channel::Debug, "🐞debug test 1234\n")]
    #[case(Channel::Error, "🪛error test 1234\n")]
    #[case(Channel::Network, "🛜network test 1234\n")]
    fn render_prefixes_channel_tag(#[case] channel: Channel, #[case] expected: &str) {
        let line = render(
            channel,
            &[&"test", &1234],
            DEFAULT_SEPARATOR,
            DEFAULT_TERMINATOR,
        );
        assert_eq!(line, expected);
    }

    #[test]
    fn render_uses_caller_separator_and_terminator() {
        let line = render(Channel::Debug, &[&"a", &"b", &3.5], ", ", ";");
        assert_eq!(line, "🐞debug, a, b, 3.5;");
    }

    #[test]
    fn render_without_items_prints_only_tag() {
        assert_eq!(render(Channel::Error, &[], " ", "\n"), "🪛error\n");
    }

    #[test]
    fn write_to_writes_rendered_line() {
        let mut out = Vec::new();
        write_to(&mut out, Channel::Network, &[&"GET"], " ", "\n").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "🛜network GET\n");
    }

    #[test]
    fn macros_accept_default_and_custom_formatting() {
        let path = std::path::Path::new("/tmp").display();
        crate::log_debug!("remove_folder", path);
        crate::log_error!(sep = "|", end = "\n"; "failed", 42,);
        crate::log_network!("GET", "https://itunes.apple.com/lookup");
    }
}
