use crate::session::Difficulty;

/// Source of target text for a test. The engine resolves word/paragraph
/// modes through this at session start; custom text bypasses it.
pub trait TextProvider {
    fn get_words(&self, difficulty: Difficulty) -> Vec<String>;
    fn get_paragraph(&self, difficulty: Difficulty) -> String;
}

/// Used when a provider has no data for the requested difficulty.
pub const FALLBACK_WORDS: &[&str] = &[
    "the", "be", "to", "of", "and", "a", "in", "that", "have", "I", "it", "for", "not", "on",
    "with", "he", "as", "you", "do", "at",
];

const BEGINNER_WORDS: &str = "the and that have with this from they will each about how some \
her more would first also their one what other word were many these she your them then state \
like time been when two could made over did years most only into used year must such now any \
than last own see work out part even new just day are after where here both between life being \
under never";

const INTERMEDIATE_WORDS: &str = "system political government history university international \
development environment management organization technology different education experience \
information important director movement president sometimes performance application department \
knowledge situation understanding significant successful particular operation production \
security financial effective relationship following structure everything opportunity character \
beautiful individual community throughout collection investment generation population direction \
professional immediately necessary equipment understand";

const ADVANCED_WORDS: &str = "notwithstanding nevertheless consequently simultaneously \
approximately extraordinary sophisticated characteristics implementation particularly \
significantly unfortunately recommendation standardization administration representatives \
acknowledgment opportunities responsibility questionnaire categorically understanding \
contradictory transcendental misconception authorization disproportionately extraordinarily \
indistinguishable constitutional interpretation philosophical psychological differentiation \
disestablishment epistemological extraterritorial phenomenological representational \
biodiversity representative environmentally incomprehensible";

const BEGINNER_PARAGRAPH: &str = "The quick brown fox jumps over the lazy dog. She sells sea \
shells by the sea shore. How much wood would a woodchuck chuck if a woodchuck could chuck \
wood? All good things must come to an end. Early to bed and early to rise makes a man \
healthy, wealthy and wise.";

const INTERMEDIATE_PARAGRAPH: &str = "Technology has revolutionized the way we live, work, and \
communicate. With the advent of smartphones, social media, and instant messaging, people can \
now connect with others from anywhere in the world. However, this constant connectivity also \
raises concerns about privacy, digital addiction, and the impact on face-to-face social \
interactions. As we continue to embrace new technologies, it's important to consider both \
their benefits and potential drawbacks.";

const ADVANCED_PARAGRAPH: &str = "The proliferation of artificial intelligence in contemporary \
society represents a paradigm shift in how humans interact with technology. The philosophical \
implications of machine learning algorithms that can adapt, predict, and potentially surpass \
human decision-making capabilities raises profound questions about consciousness, free will, \
and the nature of intelligence itself. Furthermore, the socioeconomic ramifications of \
widespread automation necessitate careful consideration of workforce displacement, wealth \
distribution, and the redefinition of labor in a post-industrial economy.";

/// Static word lists and paragraphs keyed by difficulty.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinTextProvider;

impl TextProvider for BuiltinTextProvider {
    fn get_words(&self, difficulty: Difficulty) -> Vec<String> {
        let words = match difficulty {
            Difficulty::Beginner => BEGINNER_WORDS,
            Difficulty::Intermediate => INTERMEDIATE_WORDS,
            Difficulty::Advanced => ADVANCED_WORDS,
        };
        words.split_whitespace().map(str::to_string).collect()
    }

    fn get_paragraph(&self, difficulty: Difficulty) -> String {
        match difficulty {
            Difficulty::Beginner => BEGINNER_PARAGRAPH,
            Difficulty::Intermediate => INTERMEDIATE_PARAGRAPH,
            Difficulty::Advanced => ADVANCED_PARAGRAPH,
        }
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_word_lists_are_nonempty_per_difficulty() {
        let provider = BuiltinTextProvider;
        for difficulty in [
            Difficulty::Beginner,
            Difficulty::Intermediate,
            Difficulty::Advanced,
        ] {
            assert!(!provider.get_words(difficulty).is_empty());
            assert!(!provider.get_paragraph(difficulty).is_empty());
        }
    }

    #[test]
    fn advanced_words_are_longer_on_average() {
        let provider = BuiltinTextProvider;
        let avg_len = |ws: Vec<String>| {
            ws.iter().map(|w| w.len()).sum::<usize>() as f64 / ws.len() as f64
        };
        let beginner = avg_len(provider.get_words(Difficulty::Beginner));
        let advanced = avg_len(provider.get_words(Difficulty::Advanced));
        assert!(advanced > beginner);
    }
}
