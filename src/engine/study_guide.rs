use rust_embed::Embed;
use serde::Deserialize;

#[derive(Embed)]
#[folder = "assets/data/"]
struct GuideAssets;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GuideSection {
    pub title: String,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GuideCategory {
    pub id: String,
    pub title: String,
    pub description: String,
    pub sections: Vec<GuideSection>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct StudyGuide {
    pub categories: Vec<GuideCategory>,
}

impl StudyGuide {
    /// Bundled guide content. Empty if the embedded file does not parse.
    pub fn bundled() -> Self {
        GuideAssets::get("study_guide.toml")
            .and_then(|file| {
                let text = std::str::from_utf8(file.data.as_ref()).ok()?.to_owned();
                match toml::from_str::<StudyGuide>(&text) {
                    Ok(guide) => Some(guide),
                    Err(e) => {
                        tracing::error!("bundled study guide is invalid: {e}");
                        None
                    }
                }
            })
            .unwrap_or_default()
    }

    pub fn position(&self, category_id: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.id == category_id)
    }

    pub fn category(&self, index: usize) -> Option<&GuideCategory> {
        self.categories.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_guide_has_all_categories() {
        let guide = StudyGuide::bundled();
        for id in ["math_basics", "seq_logic", "word_problems", "logic_verbal"] {
            assert!(guide.position(id).is_some(), "missing {id}");
        }
        assert!(guide.categories.iter().all(|c| !c.sections.is_empty()));
    }

    #[test]
    fn test_unknown_category() {
        let guide = StudyGuide::bundled();
        assert!(guide.position("astronomy").is_none());
        assert!(guide.category(99).is_none());
    }
}
