use crate::language::Classifier;
use regex::Regex;

/// Share of kana among kana and Han characters at which text counts as Japanese
const MIN_KANA_SHARE: f64 = 0.15;

/// Classifies text by the Unicode script most of its letters belong to
///
/// Links and @-mentions are removed first since they say nothing about the
/// language a post is written in. Latin-script text cannot be told apart by
/// script alone and is left unclassified.
pub struct ScriptClassifier {
    min_share: f64,
    noise: Regex,
    kana: Regex,
    han: Regex,
    scripts: Vec<(&'static str, Regex)>,
}

impl ScriptClassifier {
    /// Creates a classifier that requires a script to exceed `min_share` of a post's letters
    pub fn new(min_share: f64) -> Result<Self, regex::Error> {
        let scripts = [
            ("zh", r"\p{Han}"),
            ("ko", r"\p{Hangul}"),
            ("ru", r"\p{Cyrillic}"),
            ("ar", r"\p{Arabic}"),
            ("el", r"\p{Greek}"),
            ("he", r"\p{Hebrew}"),
            ("th", r"\p{Thai}"),
            ("hi", r"\p{Devanagari}"),
        ]
        .into_iter()
        .map(|(tag, pattern)| Regex::new(pattern).map(|re| (tag, re)))
        .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            min_share,
            noise: Regex::new(r"https?://\S+|@\w+")?,
            kana: Regex::new(r"[\p{Hiragana}\p{Katakana}]")?,
            han: Regex::new(r"\p{Han}")?,
            scripts,
        })
    }

    /// Share of `text`'s letters matched by `re`
    fn share(re: &Regex, text: &str, letters: usize) -> f64 {
        re.find_iter(text).count() as f64 / letters as f64
    }
}

impl Classifier for ScriptClassifier {
    fn detect(&self, text: &str) -> Option<String> {
        let cleaned = self.noise.replace_all(text, " ");
        let letters = cleaned.chars().filter(|c| c.is_alphabetic()).count();
        if letters == 0 {
            return None;
        }

        // Japanese mixes kana with Han; a stray の in Chinese text is not enough
        let kana = self.kana.find_iter(&cleaned).count();
        if kana > 0 {
            let han = self.han.find_iter(&cleaned).count();
            let kana_share = kana as f64 / (kana + han) as f64;
            if kana_share >= MIN_KANA_SHARE
                && (kana + han) as f64 / letters as f64 > self.min_share
            {
                return Some("ja".to_string());
            }
        }

        self.scripts
            .iter()
            .map(|(tag, re)| (*tag, Self::share(re, &cleaned, letters)))
            .filter(|(_, share)| *share > self.min_share)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(tag, _)| tag.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> ScriptClassifier {
        ScriptClassifier::new(0.3).unwrap()
    }

    #[test]
    fn test_detect_chinese() {
        assert_eq!(classifier().detect("今天天气很好"), Some("zh".to_string()));
    }

    #[test]
    fn test_detect_japanese_over_chinese() {
        assert_eq!(
            classifier().detect("今日はいい天気ですね"),
            Some("ja".to_string())
        );
    }

    #[test]
    fn test_stray_kana_in_chinese_stays_chinese() {
        let c = classifier();
        assert_eq!(c.detect("今天的天气真的很好の"), Some("zh".to_string()));
        assert_eq!(
            c.detect("这家店的拉面の味道真的很不错，推荐大家去试试"),
            Some("zh".to_string())
        );
    }

    #[test]
    fn test_han_heavy_japanese_is_japanese() {
        assert_eq!(classifier().detect("東京駅に到着"), Some("ja".to_string()));
    }

    #[test]
    fn test_detect_other_scripts() {
        let c = classifier();
        assert_eq!(c.detect("안녕하세요 여러분"), Some("ko".to_string()));
        assert_eq!(c.detect("Привет, как дела?"), Some("ru".to_string()));
        assert_eq!(c.detect("Καλημέρα κόσμε"), Some("el".to_string()));
    }

    #[test]
    fn test_latin_is_unclassified() {
        assert_eq!(classifier().detect("hello world, nice day"), None);
    }

    #[test]
    fn test_empty_and_symbol_text() {
        let c = classifier();
        assert_eq!(c.detect(""), None);
        assert_eq!(c.detect("  123 !!! 🎉 "), None);
    }

    #[test]
    fn test_minority_script_below_share() {
        // Two Han characters among many Latin letters
        assert_eq!(
            classifier().detect("learning the word 你好 today with friends"),
            None
        );
    }

    #[test]
    fn test_links_and_mentions_ignored() {
        assert_eq!(
            classifier().detect("@someone_with_long_name 好的 https://example.com/a/very/long/path"),
            Some("zh".to_string())
        );
    }
}
