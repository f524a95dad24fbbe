use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    #[default]
    SingleChoice,
    MultipleChoice,
    OpenText,
}

impl QuestionType {
    pub fn is_choice(&self) -> bool {
        matches!(self, QuestionType::SingleChoice | QuestionType::MultipleChoice)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionDifficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// How an OPEN_TEXT answer is graded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpenValidationType {
    Manual,
    Keywords,
    Both,
}

impl OpenValidationType {
    pub fn uses_keywords(&self) -> bool {
        matches!(self, OpenValidationType::Keywords | OpenValidationType::Both)
    }

    pub fn needs_review(&self) -> bool {
        matches!(self, OpenValidationType::Manual | OpenValidationType::Both)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackType {
    ErrorInQuestion,
    ErrorInAnswer,
    Unclear,
    Suggestion,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackStatus {
    #[default]
    Pending,
    Reviewed,
    Resolved,
    Rejected,
}

/// Label for the answer at `position`: A..Z, then AA, AB, ...
pub fn answer_label(position: usize) -> String {
    let mut n = position + 1;
    let mut label = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    label.reverse();
    String::from_utf8(label).unwrap_or_default()
}

/// Inverse of [`answer_label`] for single letters, used when reading import rows.
pub fn label_position(label: &str) -> Option<usize> {
    let mut chars = label.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            Some((c.to_ascii_uppercase() as u8 - b'A') as usize)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_sequential() {
        assert_eq!(answer_label(0), "A");
        assert_eq!(answer_label(4), "E");
        assert_eq!(answer_label(25), "Z");
        assert_eq!(answer_label(26), "AA");
        assert_eq!(answer_label(27), "AB");
    }

    #[test]
    fn label_position_reads_single_letters() {
        assert_eq!(label_position("a"), Some(0));
        assert_eq!(label_position(" C "), Some(2));
        assert_eq!(label_position("AB"), None);
        assert_eq!(label_position("1"), None);
    }

    #[test]
    fn enums_use_screaming_snake_case() {
        let json = serde_json::to_string(&QuestionType::MultipleChoice).unwrap();
        assert_eq!(json, "\"MULTIPLE_CHOICE\"");
        let parsed: OpenValidationType = serde_json::from_str("\"BOTH\"").unwrap();
        assert_eq!(parsed, OpenValidationType::Both);
    }
}
