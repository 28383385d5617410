use serde::Serialize;

/// Registry cell highlight; rendering only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleTag {
    AtRisk,
    Clear,
}

impl StyleTag {
    pub fn background(self) -> &'static str {
        match self {
            StyleTag::AtRisk => "#ff7675",
            StyleTag::Clear => "#55efc4",
        }
    }

    pub fn css(self) -> String {
        format!("background-color: {}", self.background())
    }
}

pub fn cell_style(risk_status: bool) -> StyleTag {
    if risk_status {
        StyleTag::AtRisk
    } else {
        StyleTag::Clear
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_maps_to_red_and_clear_to_green() {
        assert_eq!(cell_style(true), StyleTag::AtRisk);
        assert_eq!(cell_style(false).css(), "background-color: #55efc4");
        assert_eq!(StyleTag::AtRisk.background(), "#ff7675");
    }
}
