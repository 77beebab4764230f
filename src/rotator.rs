pub const SUBTITLE_SELECTOR: &str = ".hero__subtitle";

pub const HERO_PHRASES: [&str; 3] = [
    "Combino diseño centrado en el usuario, arquitectura limpia y despliegues confiables.",
    "Orquesto experiencias coherentes en mobile, web y escritorio con enfoque en negocio.",
    "Entrego software que se puede medir, mantener y escalar sin drama.",
];

pub struct SubtitleRotator {
    phrases: Vec<String>,
    index: usize,
}

impl SubtitleRotator {
    pub fn new<I, S>(phrases: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let phrases: Vec<String> = phrases.into_iter().map(Into::into).collect();
        if phrases.is_empty() {
            return None;
        }

        Some(Self { phrases, index: 0 })
    }

    pub fn hero() -> Self {
        Self {
            phrases: HERO_PHRASES.iter().map(|phrase| phrase.to_string()).collect(),
            index: 0,
        }
    }

    pub fn current(&self) -> &str {
        &self.phrases[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Advances one phrase, wrapping at the end, and returns the new text.
    pub fn tick(&mut self) -> &str {
        self.index = (self.index + 1) % self.phrases.len();
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_phrase_list_is_rejected() {
        assert!(SubtitleRotator::new(Vec::<String>::new()).is_none());
    }

    #[test]
    fn text_after_n_ticks_wraps_modulo_len() {
        let phrases = ["a", "b", "c"];
        let mut rotator = SubtitleRotator::new(phrases).expect("non-empty phrases");
        assert_eq!(rotator.current(), "a");

        for n in 1..=10 {
            let text = rotator.tick().to_string();
            assert_eq!(text, phrases[n % phrases.len()]);
        }
    }

    #[test]
    fn single_phrase_stays_put() {
        let mut rotator = SubtitleRotator::new(["solo"]).expect("non-empty phrases");
        assert_eq!(rotator.tick(), "solo");
        assert_eq!(rotator.index(), 0);
    }

    #[test]
    fn hero_rotator_starts_on_first_phrase() {
        let mut rotator = SubtitleRotator::hero();
        assert_eq!(rotator.current(), HERO_PHRASES[0]);
        assert_eq!(rotator.tick(), HERO_PHRASES[1]);
    }
}
