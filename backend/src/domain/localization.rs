//! Server-side localisation: supported locales and the message catalogue.
//!
//! Notification copy is rendered once, when the notification is written, in
//! the language of the reader who triggered it. The catalogue is compiled in;
//! there is no runtime dictionary loading.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported interface languages. Turkish is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Tr,
    En,
}

/// Error returned when a language tag names an unsupported locale.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language '{tag}'; expected one of: tr, en")]
pub struct UnsupportedLocaleError {
    tag: String,
}

impl Locale {
    /// Two-letter code used in sessions and payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tr => "tr",
            Self::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = UnsupportedLocaleError;

    /// Parse a BCP 47 tag by its primary subtag (`en-US` is English).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let primary = s
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "tr" => Ok(Self::Tr),
            "en" => Ok(Self::En),
            _ => Err(UnsupportedLocaleError { tag: s.to_owned() }),
        }
    }
}

/// Keys for the server-rendered strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    FriendRequestTitle,
    SentFriendRequest,
    FriendAcceptedTitle,
    AcceptedFriendRequest,
    BookRecommendationTitle,
    RecommendedBook,
    UnknownAuthor,
}

impl MessageKey {
    /// Every key, for catalogue completeness checks.
    pub const ALL: [Self; 7] = [
        Self::FriendRequestTitle,
        Self::SentFriendRequest,
        Self::FriendAcceptedTitle,
        Self::AcceptedFriendRequest,
        Self::BookRecommendationTitle,
        Self::RecommendedBook,
        Self::UnknownAuthor,
    ];
}

/// Resolves message keys for one locale.
///
/// # Examples
/// ```
/// use shelfmate::domain::{Locale, MessageKey, Translator};
///
/// let translator = Translator::new(Locale::En);
/// assert_eq!(translator.text(MessageKey::UnknownAuthor), "Unknown Author");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Translator {
    locale: Locale,
}

impl Translator {
    pub const fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Localised text for `key`.
    pub const fn text(&self, key: MessageKey) -> &'static str {
        match self.locale {
            Locale::Tr => turkish(key),
            Locale::En => english(key),
        }
    }
}

const fn turkish(key: MessageKey) -> &'static str {
    match key {
        MessageKey::FriendRequestTitle => "Yeni Arkadaşlık İsteği",
        MessageKey::SentFriendRequest => "size arkadaşlık isteği gönderdi",
        MessageKey::FriendAcceptedTitle => "Arkadaşlık İsteği Kabul Edildi",
        MessageKey::AcceptedFriendRequest => "arkadaşlık isteğinizi kabul etti",
        MessageKey::BookRecommendationTitle => "Yeni Kitap Önerisi",
        MessageKey::RecommendedBook => "size bir kitap önerdi",
        MessageKey::UnknownAuthor => "Bilinmeyen Yazar",
    }
}

const fn english(key: MessageKey) -> &'static str {
    match key {
        MessageKey::FriendRequestTitle => "New Friend Request",
        MessageKey::SentFriendRequest => "sent you a friend request",
        MessageKey::FriendAcceptedTitle => "Friend Request Accepted",
        MessageKey::AcceptedFriendRequest => "accepted your friend request",
        MessageKey::BookRecommendationTitle => "New Book Recommendation",
        MessageKey::RecommendedBook => "recommended you a book",
        MessageKey::UnknownAuthor => "Unknown Author",
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("tr", Some(Locale::Tr))]
    #[case("TR-tr", Some(Locale::Tr))]
    #[case("en_US", Some(Locale::En))]
    #[case(" en ", Some(Locale::En))]
    #[case("de", None)]
    #[case("", None)]
    fn parses_primary_subtag(#[case] raw: &str, #[case] expected: Option<Locale>) {
        assert_eq!(raw.parse::<Locale>().ok(), expected);
    }

    #[rstest]
    fn default_locale_is_turkish() {
        assert_eq!(Locale::default(), Locale::Tr);
        assert_eq!(Translator::default().text(MessageKey::UnknownAuthor), "Bilinmeyen Yazar");
    }

    #[rstest]
    #[case(Locale::Tr)]
    #[case(Locale::En)]
    fn catalogue_is_complete(#[case] locale: Locale) {
        let translator = Translator::new(locale);
        for key in MessageKey::ALL {
            assert!(!translator.text(key).trim().is_empty(), "{key:?} missing for {locale}");
        }
    }

    #[rstest]
    fn locale_serialises_lowercase() {
        let json = serde_json::to_string(&Locale::En).expect("serialise locale");
        assert_eq!(json, "\"en\"");
    }
}
