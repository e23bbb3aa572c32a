//! Command-line parsing.
//!
//! Parsing happens in two steps so the admin check can sit between them:
//! [`Invocation::parse`] only recognizes the verb, and
//! [`Command::from_invocation`] validates the arguments afterwards.

use std::str::FromStr;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Verb
// ---------------------------------------------------------------------------

/// The command words the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Start,
    Add,
    Pay,
    SetDue,
    ResetToday,
    List,
    Details,
}

impl Verb {
    /// Mutating verbs require the admin identity.
    pub fn is_mutating(self) -> bool {
        matches!(self, Verb::Add | Verb::Pay | Verb::SetDue | Verb::ResetToday)
    }

    pub fn usage(self) -> &'static str {
        match self {
            Verb::Start => "/start",
            Verb::Add => "/add <name> <amount>",
            Verb::Pay => "/pay <name> <amount>",
            Verb::SetDue => "/setdue <name> <amount>",
            Verb::ResetToday => "/reset_today",
            Verb::List => "/list",
            Verb::Details => "/details <name>",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Start => "start",
            Verb::Add => "add",
            Verb::Pay => "pay",
            Verb::SetDue => "setdue",
            Verb::ResetToday => "reset_today",
            Verb::List => "list",
            Verb::Details => "details",
        }
    }
}

impl FromStr for Verb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "start" => Ok(Verb::Start),
            "add" => Ok(Verb::Add),
            "pay" => Ok(Verb::Pay),
            "setdue" => Ok(Verb::SetDue),
            "reset_today" => Ok(Verb::ResetToday),
            "list" => Ok(Verb::List),
            "details" => Ok(Verb::Details),
            other => Err(Error::UnknownCommand(other.to_string())),
        }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Invocation
// ---------------------------------------------------------------------------

/// A recognized verb plus its raw, unvalidated arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub verb: Verb,
    pub args: Vec<String>,
}

impl Invocation {
    /// Parse `[/]verb[@botname] args...`.
    pub fn parse(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let head = words
            .next()
            .ok_or_else(|| Error::UnknownCommand(String::new()))?;

        let head = head.strip_prefix('/').unwrap_or(head);
        let word = head.split_once('@').map_or(head, |(word, _bot)| word);

        Ok(Self {
            verb: word.parse()?,
            args: words.map(str::to_string).collect(),
        })
    }
}

/// The bot username after `@` in the first word of `line`, if any.
///
/// `/add@TrackerBot alice 5` is addressed to `TrackerBot`; `/add alice 5`
/// is addressed to no bot in particular.
pub fn addressee(line: &str) -> Option<&str> {
    let head = line.split_whitespace().next()?;
    head.split_once('@').map(|(_word, bot)| bot)
}

// ---------------------------------------------------------------------------
// Amounts
// ---------------------------------------------------------------------------

/// Code point of the digit zero for each Unicode decimal digit block users
/// are likely to type. Each block holds ten consecutive digits.
const DIGIT_ZEROS: &[u32] = &[
    0x0030, // ASCII
    0x0660, // Arabic-Indic
    0x06F0, // Extended Arabic-Indic
    0x07C0, // NKo
    0x0966, // Devanagari
    0x09E6, // Bengali
    0x0A66, // Gurmukhi
    0x0AE6, // Gujarati
    0x0B66, // Oriya
    0x0BE6, // Tamil
    0x0C66, // Telugu
    0x0CE6, // Kannada
    0x0D66, // Malayalam
    0x0DE6, // Sinhala Lith
    0x0E50, // Thai
    0x0ED0, // Lao
    0x0F20, // Tibetan
    0x1040, // Myanmar
    0x1090, // Myanmar Shan
    0x17E0, // Khmer
    0x1810, // Mongolian
    0x1946, // Limbu
    0x19D0, // New Tai Lue
    0x1A80, // Tai Tham Hora
    0x1A90, // Tai Tham Tham
    0x1B50, // Balinese
    0x1BB0, // Sundanese
    0x1C40, // Lepcha
    0x1C50, // Ol Chiki
    0xA620, // Vai
    0xA8D0, // Saurashtra
    0xA900, // Kayah Li
    0xA9D0, // Javanese
    0xA9F0, // Myanmar Tai Laing
    0xAA50, // Cham
    0xABF0, // Meetei Mayek
    0xFF10, // Fullwidth
];

fn decimal_digit(c: char) -> Option<u8> {
    let c = u32::from(c);
    DIGIT_ZEROS
        .iter()
        .find(|&&zero| (zero..zero + 10).contains(&c))
        .and_then(|&zero| u8::try_from(c - zero).ok())
}

/// Parse a whole-number amount.
///
/// Accepts an optional sign followed by decimal digits from any of the
/// scripts in `DIGIT_ZEROS`, so `৫` reads as 5. A single `_` may separate
/// two digits (`1_000`). Anything else, including fractions, is rejected.
pub fn parse_amount(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    let mut after_underscore = false;
    for c in digits.chars() {
        if c == '_' {
            if !seen_digit || after_underscore {
                return None;
            }
            after_underscore = true;
            continue;
        }
        let digit = i64::from(decimal_digit(c)?);
        value = value.checked_mul(10)?;
        // Accumulate toward the sign so i64::MIN still parses.
        value = if negative {
            value.checked_sub(digit)?
        } else {
            value.checked_add(digit)?
        };
        seen_digit = true;
        after_underscore = false;
    }

    (seen_digit && !after_underscore).then_some(value)
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A fully validated command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    AddWork { name: String, amount: i64 },
    Pay { name: String, amount: i64 },
    SetDue { name: String, amount: i64 },
    ResetToday,
    List,
    Details { name: String },
}

impl Command {
    /// Validate arguments. Extra trailing arguments are ignored.
    pub fn from_invocation(invocation: &Invocation) -> Result<Self> {
        let verb = invocation.verb;
        let args = &invocation.args;
        let invalid = || Error::InvalidArguments {
            usage: verb.usage(),
        };

        let name = || args.first().cloned().ok_or_else(invalid);
        let amount = || {
            args.get(1)
                .and_then(|raw| parse_amount(raw))
                .ok_or_else(invalid)
        };

        Ok(match verb {
            Verb::Start => Command::Start,
            Verb::Add => Command::AddWork {
                name: name()?,
                amount: amount()?,
            },
            Verb::Pay => Command::Pay {
                name: name()?,
                amount: amount()?,
            },
            Verb::SetDue => Command::SetDue {
                name: name()?,
                amount: amount()?,
            },
            Verb::ResetToday => Command::ResetToday,
            Verb::List => Command::List,
            Verb::Details => Command::Details { name: name()? },
        })
    }

    pub fn verb(&self) -> Verb {
        match self {
            Command::Start => Verb::Start,
            Command::AddWork { .. } => Verb::Add,
            Command::Pay { .. } => Verb::Pay,
            Command::SetDue { .. } => Verb::SetDue,
            Command::ResetToday => Verb::ResetToday,
            Command::List => Verb::List,
            Command::Details { .. } => Verb::Details,
        }
    }
}
