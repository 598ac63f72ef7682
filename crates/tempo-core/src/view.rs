use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CollapseError;

/// One of the three independent task list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ViewId {
    Default,
    Waiting,
    Completed,
}

impl ViewId {
    pub const ALL: [ViewId; 3] = [ViewId::Default, ViewId::Waiting, ViewId::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewId::Default => "default",
            ViewId::Waiting => "waiting",
            ViewId::Completed => "completed",
        }
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewId {
    type Err = CollapseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" | "active" => Ok(ViewId::Default),
            "waiting" => Ok(ViewId::Waiting),
            "completed" => Ok(ViewId::Completed),
            _ => Err(CollapseError::UnknownView(s.to_string())),
        }
    }
}

impl TryFrom<String> for ViewId {
    type Error = CollapseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::ViewId;
    use crate::error::CollapseError;

    #[test]
    fn parses_names_and_alias() {
        assert_eq!("Waiting".parse::<ViewId>().unwrap(), ViewId::Waiting);
        assert_eq!(" active ".parse::<ViewId>().unwrap(), ViewId::Default);
        assert_eq!("completed".parse::<ViewId>().unwrap(), ViewId::Completed);
    }

    #[test]
    fn rejects_unknown_view() {
        let err = "archive".parse::<ViewId>().unwrap_err();
        assert!(matches!(err, CollapseError::UnknownView(ref name) if name == "archive"));
    }

    #[test]
    fn serde_accepts_the_same_spellings_as_parse() {
        let views: Vec<ViewId> =
            serde_json::from_str(r#"["Waiting", " ACTIVE ", "completed", "default"]"#).unwrap();
        assert_eq!(
            views,
            vec![ViewId::Waiting, ViewId::Default, ViewId::Completed, ViewId::Default]
        );

        let err = serde_json::from_str::<ViewId>(r#""archive""#).unwrap_err();
        assert!(err.to_string().contains("unknown view"));

        assert_eq!(serde_json::to_string(&ViewId::Waiting).unwrap(), r#""waiting""#);
    }

    #[test]
    fn display_round_trips_through_parse() {
        for view in ViewId::ALL {
            assert_eq!(view.to_string().parse::<ViewId>().unwrap(), view);
        }
    }
}
