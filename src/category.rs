//! Keyword-based file categorization.
//!
//! This module maps a filename to one of five fixed research categories by
//! checking whether any of the category's keywords appears in the lowercased,
//! extension-stripped basename. Categories are checked in declared order and
//! the first hit wins.
//!
//! # Examples
//!
//! ```
//! use autosort::category::{Category, Classifier};
//!
//! let classifier = Classifier::default();
//! assert_eq!(classifier.classify("interview_transcript_03"), Some(Category::Qual));
//! assert_eq!(classifier.classify("q3_survey_data"), Some(Category::Quant));
//! assert_eq!(classifier.classify("holiday"), None);
//! ```
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// One of the five fixed classification buckets.
///
/// The declaration order is the match priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Interviews, transcripts, consent forms, ethics material.
    Qual,
    /// Surveys, charts, data and analysis.
    Quant,
    /// Drafts, proposals, reports, manuscripts.
    Drafts,
    /// Journal articles, books, white papers.
    Literature,
    /// Photos, posters, slides and other media.
    Additional,
}

impl Category {
    /// All categories in match-priority order.
    pub const ALL: [Category; 5] = [
        Category::Qual,
        Category::Quant,
        Category::Drafts,
        Category::Literature,
        Category::Additional,
    ];

    /// Returns the short lowercase key used in config files and reports.
    ///
    /// # Examples
    ///
    /// ```
    /// use autosort::category::Category;
    ///
    /// assert_eq!(Category::Qual.key(), "qual");
    /// assert_eq!(Category::Additional.key(), "additional");
    /// ```
    pub fn key(&self) -> &'static str {
        match self {
            Category::Qual => "qual",
            Category::Quant => "quant",
            Category::Drafts => "drafts",
            Category::Literature => "literature",
            Category::Additional => "additional",
        }
    }

    /// Returns the destination folder name used when the config gives none.
    pub fn default_dir_name(&self) -> &'static str {
        match self {
            Category::Qual => "Qualitative Analysis",
            Category::Quant => "Quantitative Analysis",
            Category::Drafts => "Drafts and Reports",
            Category::Literature => "Literature Review",
            Category::Additional => "Additional Materials",
        }
    }

    /// Returns the built-in keyword list, in priority order.
    pub fn default_keywords(&self) -> &'static [&'static str] {
        match self {
            Category::Qual => &[
                "interview",
                "transcript",
                "consent",
                "information sheet",
                "participant",
                "ethic",
                "访谈",
                "逐字稿",
                "同意书",
                "信息表",
                "参与者",
                "伦理",
            ],
            Category::Quant => &[
                "survey",
                "chart",
                "comparison",
                "response",
                "analysis",
                "data",
                "quantitative",
                "问卷",
                "图表",
                "对比",
                "响应",
                "分析",
                "数据",
                "定量",
            ],
            Category::Drafts => &[
                "draft",
                "proposal",
                "report",
                "manuscript",
                "草稿",
                "方案",
                "报告",
                "稿件",
            ],
            Category::Literature => &[
                "journal",
                "article",
                "literature",
                "ebook",
                "book",
                "white paper",
                "文献",
                "期刊",
                "书",
                "白皮书",
            ],
            Category::Additional => &[
                "photo",
                "poster",
                "slide",
                "presentation",
                "diagram",
                "visual",
                "media",
                "brochure",
                "flyer",
                "照片",
                "海报",
                "幻灯",
                "演示",
                "示意图",
                "宣传",
                "折页",
                "传单",
            ],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.key() == lower)
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// A category bound to its resolved destination directory and keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub category: Category,
    pub destination: PathBuf,
    pub keywords: Vec<String>,
}

/// First-match-wins filename classifier.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<(Category, Vec<String>)>,
}

impl Classifier {
    /// Builds a classifier from `(category, keywords)` pairs.
    ///
    /// Pairs are checked in the order given. Keywords are lowercased and
    /// empty keywords are dropped.
    pub fn new<I, K, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = (Category, K)>,
        K: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = rules
            .into_iter()
            .map(|(category, keywords)| {
                let keywords = keywords
                    .into_iter()
                    .map(|k| k.as_ref().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                (category, keywords)
            })
            .collect();
        Self { rules }
    }

    /// Builds a classifier from resolved category rules.
    pub fn from_rules(rules: &[CategoryRule]) -> Self {
        Self::new(rules.iter().map(|r| (r.category, r.keywords.iter())))
    }

    /// Returns the first category with a keyword contained in `stem_lower`.
    ///
    /// The input is expected to be lowercased already.
    pub fn classify(&self, stem_lower: &str) -> Option<Category> {
        self.rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| stem_lower.contains(k.as_str())))
            .map(|(category, _)| *category)
    }

    /// Classifies a path by its lowercased extension-stripped basename.
    pub fn classify_path(&self, path: &Path) -> Option<Category> {
        self.classify(&stem_lower(path))
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(
            Category::ALL
                .into_iter()
                .map(|c| (c, c.default_keywords().iter().copied())),
        )
    }
}

/// Lowercased extension-stripped basename of a path.
pub fn stem_lower(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_keys() {
        assert_eq!(Category::Qual.key(), "qual");
        assert_eq!(Category::Quant.key(), "quant");
        assert_eq!(Category::Drafts.key(), "drafts");
        assert_eq!(Category::Literature.key(), "literature");
        assert_eq!(Category::Additional.key(), "additional");
    }

    #[test]
    fn test_category_from_str_case_insensitive() {
        assert_eq!("QUAL".parse::<Category>(), Ok(Category::Qual));
        assert_eq!(" Literature ".parse::<Category>(), Ok(Category::Literature));
        assert!("misc".parse::<Category>().is_err());
    }

    #[test]
    fn test_interview_transcript_is_qual() {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.classify_path(Path::new("Interview_Transcript_03.docx")),
            Some(Category::Qual)
        );
    }

    #[test]
    fn test_survey_data_is_quant() {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.classify_path(Path::new("Q3_Survey_Data.xlsx")),
            Some(Category::Quant)
        );
    }

    #[test]
    fn test_each_category_matches_its_keywords() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("consent form"), Some(Category::Qual));
        assert_eq!(classifier.classify("bar chart"), Some(Category::Quant));
        assert_eq!(classifier.classify("final manuscript"), Some(Category::Drafts));
        assert_eq!(classifier.classify("smith 2020 journal"), Some(Category::Literature));
        assert_eq!(classifier.classify("conference poster"), Some(Category::Additional));
    }

    #[test]
    fn test_earlier_category_wins() {
        let classifier = Classifier::default();
        // "report" is drafts, "data" is quant; quant is declared first
        assert_eq!(classifier.classify("data report"), Some(Category::Quant));
        // "participant" is qual, "photo" is additional
        assert_eq!(classifier.classify("participant photo"), Some(Category::Qual));
    }

    #[test]
    fn test_chinese_keywords() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("访谈记录"), Some(Category::Qual));
        assert_eq!(classifier.classify("问卷结果"), Some(Category::Quant));
        assert_eq!(classifier.classify("白皮书"), Some(Category::Literature));
    }

    #[test]
    fn test_no_match() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("holiday"), None);
        assert_eq!(classifier.classify_path(Path::new("notes.txt")), None);
    }

    #[test]
    fn test_extension_is_not_matched() {
        let classifier = Classifier::default();
        // the extension is stripped before matching
        assert_eq!(classifier.classify_path(Path::new("scan.data")), None);
    }

    #[test]
    fn test_custom_rules_order_and_case() {
        let classifier = Classifier::new([
            (Category::Literature, vec!["Book"]),
            (Category::Qual, vec!["book", "memo"]),
        ]);
        assert_eq!(classifier.classify("ebook draft"), Some(Category::Literature));
        assert_eq!(classifier.classify("memo"), Some(Category::Qual));
    }

    #[test]
    fn test_empty_keyword_never_matches() {
        let classifier = Classifier::new([(Category::Qual, vec![""])]);
        assert_eq!(classifier.classify("anything"), None);
    }

    #[test]
    fn test_stem_lower() {
        assert_eq!(stem_lower(Path::new("dir/Chart.PNG")), "chart");
        assert_eq!(stem_lower(Path::new(".DS_Store")), ".ds_store");
        assert_eq!(stem_lower(Path::new("a.tar.gz")), "a.tar");
    }
}
