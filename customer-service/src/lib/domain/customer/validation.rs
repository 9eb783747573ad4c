//! Field rules for customer and card records.
//!
//! Each field is described once as a [`FieldRule`]: a name plus the list of
//! constraints its value must satisfy. [`FieldRule::check`] is the only code
//! that interprets constraints, so create, update and card parsing all share
//! the exact same rules.

use std::str::FromStr;

use chrono::NaiveDate;

use crate::domain::customer::errors::FieldViolation;

/// Raw value handed to a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Integer(i64),
    /// A calendar date, judged relative to `today`.
    Date { value: NaiveDate, today: NaiveDate },
}

/// Character classes referenced by constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    AsciiLetter,
    LetterOrSpace,
    Lowercase,
    Uppercase,
    Digit,
    /// One of `@$!%*?&`
    Symbol,
    /// `[A-Za-z0-9._]`
    IdentifierChar,
    /// Letters, digits and [`CharClass::Symbol`]
    PasswordChar,
}

const PASSWORD_SYMBOLS: &[char] = &['@', '$', '!', '%', '*', '?', '&'];
const ID_SEPARATORS: &[char] = &['.', '_'];

impl CharClass {
    pub fn matches(self, c: char) -> bool {
        match self {
            CharClass::AsciiLetter => c.is_ascii_alphabetic(),
            CharClass::LetterOrSpace => c.is_ascii_alphabetic() || c == ' ',
            CharClass::Lowercase => c.is_ascii_lowercase(),
            CharClass::Uppercase => c.is_ascii_uppercase(),
            CharClass::Digit => c.is_ascii_digit(),
            CharClass::Symbol => PASSWORD_SYMBOLS.contains(&c),
            CharClass::IdentifierChar => c.is_ascii_alphanumeric() || ID_SEPARATORS.contains(&c),
            CharClass::PasswordChar => c.is_ascii_alphanumeric() || PASSWORD_SYMBOLS.contains(&c),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            CharClass::AsciiLetter => "a letter",
            CharClass::LetterOrSpace => "letters and spaces",
            CharClass::Lowercase => "lowercase letter",
            CharClass::Uppercase => "uppercase letter",
            CharClass::Digit => "digit",
            CharClass::Symbol => "special character from @$!%*?&",
            CharClass::IdentifierChar => "letters, digits, '.' and '_'",
            CharClass::PasswordChar => "letters, digits and @$!%*?&",
        }
    }
}

/// A single check on a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Length in characters, inclusive bounds.
    CharCount { min: usize, max: usize },
    /// Every character belongs to the class.
    OnlyChars(CharClass),
    /// First character belongs to the class.
    StartsWith(CharClass),
    /// At least one character belongs to the class.
    Contains(CharClass),
    /// Neither first nor last character is one of these.
    NoEdgeChars(&'static [char]),
    /// No two characters from this set appear side by side.
    NoAdjacentChars(&'static [char]),
    /// Exactly this many ASCII digits and nothing else.
    Digits(usize),
    /// `local@domain` with a dotted domain name.
    Email,
    /// Equal to one of these strings.
    OneOf(&'static [&'static str]),
    /// Integer within inclusive bounds.
    Range { min: i64, max: i64 },
    /// Date strictly later than today.
    AfterToday,
}

impl Constraint {
    /// Returns the violation message, or `None` if the value satisfies the constraint.
    pub fn violation(&self, value: &FieldValue<'_>) -> Option<String> {
        match (*self, *value) {
            (Constraint::CharCount { min, max }, FieldValue::Text(text)) => {
                let count = text.chars().count();
                (count < min || count > max)
                    .then(|| format!("must be between {} and {} characters long", min, max))
            }
            (Constraint::OnlyChars(class), FieldValue::Text(text)) => (!text
                .chars()
                .all(|c| class.matches(c)))
            .then(|| format!("may only contain {}", class.describe())),
            (Constraint::StartsWith(class), FieldValue::Text(text)) => (!text
                .chars()
                .next()
                .is_some_and(|c| class.matches(c)))
            .then(|| format!("must start with {}", class.describe())),
            (Constraint::Contains(class), FieldValue::Text(text)) => (!text
                .chars()
                .any(|c| class.matches(c)))
            .then(|| format!("must contain at least one {}", class.describe())),
            (Constraint::NoEdgeChars(chars), FieldValue::Text(text)) => {
                let at_edge = text.chars().next().is_some_and(|c| chars.contains(&c))
                    || text.chars().last().is_some_and(|c| chars.contains(&c));
                at_edge.then(|| format!("must not start or end with {}", list_chars(chars)))
            }
            (Constraint::NoAdjacentChars(chars), FieldValue::Text(text)) => {
                let adjacent = text
                    .chars()
                    .zip(text.chars().skip(1))
                    .any(|(a, b)| chars.contains(&a) && chars.contains(&b));
                adjacent.then(|| format!("must not contain consecutive {}", list_chars(chars)))
            }
            (Constraint::Digits(count), FieldValue::Text(text)) => {
                let valid = text.len() == count && text.bytes().all(|b| b.is_ascii_digit());
                (!valid).then(|| format!("must be exactly {} digits", count))
            }
            (Constraint::Email, FieldValue::Text(text)) => {
                (!is_email(text)).then(|| "must be a valid email address".to_string())
            }
            (Constraint::OneOf(options), FieldValue::Text(text)) => (!options.contains(&text))
                .then(|| format!("must be one of: {}", options.join(", "))),
            (Constraint::Range { min, max }, FieldValue::Integer(number)) => {
                (number < min || number > max)
                    .then(|| format!("must be between {} and {}", min, max))
            }
            (Constraint::AfterToday, FieldValue::Date { value, today }) => {
                (value <= today).then(|| "must be a date in the future".to_string())
            }
            _ => Some("has an unexpected type".to_string()),
        }
    }
}

fn list_chars(chars: &[char]) -> String {
    chars
        .iter()
        .map(|c| format!("'{}'", c))
        .collect::<Vec<_>>()
        .join(" or ")
}

fn is_email(text: &str) -> bool {
    match email_address::EmailAddress::from_str(text) {
        Ok(address) => {
            let domain = address.domain();
            address.email() == text
                && domain.contains('.')
                && !domain.starts_with('[')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        Err(_) => false,
    }
}

/// A field name and the constraints its value must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: &'static str,
    pub constraints: &'static [Constraint],
}

impl FieldRule {
    /// Check every constraint and report all that fail.
    pub fn check(&self, value: &FieldValue<'_>) -> Result<(), FieldViolation> {
        let messages: Vec<String> = self
            .constraints
            .iter()
            .filter_map(|constraint| constraint.violation(value))
            .collect();

        if messages.is_empty() {
            Ok(())
        } else {
            Err(FieldViolation {
                field: self.field,
                messages,
            })
        }
    }
}

const PERSON_NAME: &[Constraint] = &[
    Constraint::CharCount { min: 2, max: 20 },
    Constraint::StartsWith(CharClass::AsciiLetter),
    Constraint::OnlyChars(CharClass::LetterOrSpace),
];

pub const CUSTOMER_ID: FieldRule = FieldRule {
    field: "customerId",
    constraints: &[
        Constraint::CharCount { min: 8, max: 20 },
        Constraint::OnlyChars(CharClass::IdentifierChar),
        Constraint::NoEdgeChars(ID_SEPARATORS),
        Constraint::NoAdjacentChars(ID_SEPARATORS),
    ],
};

pub const NAME: FieldRule = FieldRule {
    field: "name",
    constraints: PERSON_NAME,
};

pub const AGE: FieldRule = FieldRule {
    field: "age",
    constraints: &[Constraint::Range { min: 18, max: 100 }],
};

pub const EMAIL: FieldRule = FieldRule {
    field: "email",
    constraints: &[Constraint::Email],
};

pub const PHONE_NO: FieldRule = FieldRule {
    field: "phoneNo",
    constraints: &[Constraint::Digits(10)],
};

pub const ADDRESS: FieldRule = FieldRule {
    field: "address",
    constraints: &[Constraint::CharCount { min: 5, max: 100 }],
};

pub const PASSWORD: FieldRule = FieldRule {
    field: "password",
    constraints: &[
        Constraint::CharCount { min: 8, max: 20 },
        Constraint::OnlyChars(CharClass::PasswordChar),
        Constraint::Contains(CharClass::Lowercase),
        Constraint::Contains(CharClass::Uppercase),
        Constraint::Contains(CharClass::Digit),
        Constraint::Contains(CharClass::Symbol),
    ],
};

pub const CARD_NUMBER: FieldRule = FieldRule {
    field: "cardNumber",
    constraints: &[Constraint::Digits(16)],
};

pub const CARD_TYPE: FieldRule = FieldRule {
    field: "cardType",
    constraints: &[Constraint::OneOf(&["Visa", "Master Card", "Amex"])],
};

pub const EXPIRATION_DATE: FieldRule = FieldRule {
    field: "expirationDate",
    constraints: &[Constraint::AfterToday],
};

pub const CVV: FieldRule = FieldRule {
    field: "cvv",
    constraints: &[Constraint::Digits(3)],
};

pub const NAME_ON_CARD: FieldRule = FieldRule {
    field: "nameOnCard",
    constraints: PERSON_NAME,
};

/// Rules of a customer record, in document order.
pub const CUSTOMER_RULES: [FieldRule; 7] =
    [CUSTOMER_ID, NAME, AGE, EMAIL, PHONE_NO, ADDRESS, PASSWORD];

/// Rules of an embedded card.
pub const CARD_RULES: [FieldRule; 5] = [CARD_NUMBER, CARD_TYPE, EXPIRATION_DATE, CVV, NAME_ON_CARD];

/// Parse a `YYYY-MM-DD` expiration date and require it to lie after `today`.
pub fn parse_expiration_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, FieldViolation> {
    let value = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        FieldViolation::new(
            EXPIRATION_DATE.field,
            "must be a calendar date in YYYY-MM-DD format",
        )
    })?;

    EXPIRATION_DATE.check(&FieldValue::Date { value, today })?;
    Ok(value)
}
