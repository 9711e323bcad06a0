// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mood classification and cover image prompt templates.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use strum::{Display, EnumIter, IntoEnumIterator};

/// Keyword-derived mood of a post, checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Mood {
    Mindfulness,
    Productivity,
    Philosophy,
    Nature,
    Skincare,
    General,
}

/// Template family the scene is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SceneCategory {
    ProductHero,
    NaturalTexture,
    LifestyleMoment,
    AbstractMood,
}

static MOOD_PATTERNS: LazyLock<Vec<(Mood, Regex)>> = LazyLock::new(|| {
    [
        (
            Mood::Mindfulness,
            r"meditat|mindful|breath|pause|slow|present|ritual|calm|still|quiet",
        ),
        (
            Mood::Productivity,
            r"productiv|focus|work|creat|routine|habit|morning|intention|discipline",
        ),
        (
            Mood::Philosophy,
            r"human|philosoph|\bai\b|technolog|meaning|purpose|exist|authentic|real",
        ),
        (
            Mood::Nature,
            r"nature|season|forest|beeswax|honey|botanical|ingredient|plant|organic",
        ),
        (
            Mood::Skincare,
            r"lip|skin|balanc|moistur|dry|chap|care|balm|beauty|wellness|hydrat",
        ),
    ]
    .into_iter()
    .map(|(mood, pattern)| (mood, Regex::new(pattern).expect("valid mood regex")))
    .collect()
});

pub const PRODUCT_BRIEF: &str = "\
Jesse A. Eisenbalm lip balm tube:
- Cream/ivory white tube (#FAF8F3), matte finish, about 2.5 inches long
- Ribbed cap with a subtle hexagonal honeycomb texture
- \"JESSE A. EISENBALM\" in vertical black monospace uppercase text
- Gold honeycomb cluster logo below the brand name
- Small, premium, hand-numbered limited edition
- Floats slightly above the surface with a soft shadow beneath";

pub const LIGHTING: [&str; 6] = [
    "golden hour sidelight with long warm shadows",
    "diffused overcast window light, calm and even",
    "soft top-down studio light, clean and serene",
    "cool morning light, pale and still",
    "dramatic raking light revealing surface texture",
    "warm candlelight, intimate and unhurried",
];

pub const SURFACES: [&str; 7] = [
    "white Carrara marble with fine grey veining",
    "pale linen fabric, softly creased",
    "raw pale concrete with micro-texture",
    "unfinished bleached oak wood grain",
    "matte cream-black slate, subtle sheen",
    "aged parchment, warm ivory tone",
    "smooth brushed ceramic, off-white",
];

const PRODUCT_HERO: &[&str] = &[
    "product tube centered, extreme close-up revealing label and honeycomb logo detail",
    "product lying on its side surrounded by dried botanicals and raw beeswax shards",
    "product flat lay overhead, minimal, generous negative space",
    "product leaning against a small honey jar, amber and cream tones",
    "two product tubes arranged in a geometric cross, symmetrical composition",
    "product in soft focus background, honey drip in sharp foreground",
];

const NATURAL_TEXTURE: &[&str] = &[
    "macro close-up of natural honeycomb cells, warm amber and gold, shallow depth of field",
    "chunk of raw beeswax with warm amber glow, tactile macro photography",
    "dried lavender sprigs on cream linen, botanical stillness",
    "beeswax melting into a warm amber pool, abstract texture study",
    "pressed dried flowers on cream surface, archival botanical quality",
    "morning dew on a single green botanical leaf, macro photography",
    "chamomile, beeswax, and honey arranged in a minimal pattern",
];

const LIFESTYLE_MOMENT: &[&str] = &[
    "open journal and ceramic mug on a wooden desk, morning ritual",
    "hands resting open on a worn wooden desk, quiet pause",
    "single lit candle in dim warm light, presence over productivity",
    "a worn hardcover book beside the product, intellectual ritual",
    "still glass of water in morning light, clarity and simplicity",
    "slow Sunday morning tableau with product, mug, and soft shadow",
];

const ABSTRACT_MOOD: &[&str] = &[
    "long shadow of a single object stretching across clean cream surface",
    "light through frosted glass casting soft geometric shapes",
    "water surface with abstract light reflections and subtle ripples",
    "crumpled cream paper with soft dramatic shadows, texture study",
    "macro of bark, stone, or dried petal in extreme detail",
    "smoke wisps rising slowly against dark muted background, ethereal",
];

impl SceneCategory {
    pub fn scenes(self) -> &'static [&'static str] {
        match self {
            Self::ProductHero => PRODUCT_HERO,
            Self::NaturalTexture => NATURAL_TEXTURE,
            Self::LifestyleMoment => LIFESTYLE_MOMENT,
            Self::AbstractMood => ABSTRACT_MOOD,
        }
    }
}

impl Mood {
    /// Scene categories this mood may draw from.
    pub fn candidate_scenes(self) -> &'static [SceneCategory] {
        use SceneCategory::*;
        match self {
            Self::Mindfulness => &[LifestyleMoment, AbstractMood, NaturalTexture],
            Self::Productivity => &[LifestyleMoment, ProductHero],
            Self::Philosophy => &[AbstractMood, LifestyleMoment],
            Self::Nature => &[NaturalTexture, ProductHero],
            Self::Skincare => &[ProductHero, NaturalTexture],
            Self::General => &[ProductHero, NaturalTexture, LifestyleMoment, AbstractMood],
        }
    }
}

/// Classify `title` and `excerpt`; the first matching mood wins.
pub fn detect_mood(title: &str, excerpt: &str) -> Mood {
    let text = format!("{title} {excerpt}").to_lowercase();
    MOOD_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(&text))
        .map(|(mood, _)| *mood)
        .unwrap_or(Mood::General)
}

/// Every mood in classification order.
pub fn moods() -> impl Iterator<Item = Mood> {
    Mood::iter()
}

/// One concrete choice of template slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverPlan {
    pub mood: Mood,
    pub category: SceneCategory,
    pub scene: &'static str,
    pub lighting: &'static str,
    pub surface: &'static str,
    pub include_product: bool,
}

fn pick<T: Copy, R: Rng>(rng: &mut R, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}

impl CoverPlan {
    /// Draw scene, lighting, and surface uniformly; the product appears in
    /// every product-hero scene and in half of the others.
    pub fn choose<R: Rng>(mood: Mood, rng: &mut R) -> Self {
        let category = pick(rng, mood.candidate_scenes());
        let scene = pick(rng, category.scenes());
        let lighting = pick(rng, &LIGHTING);
        let surface = pick(rng, &SURFACES);
        let include_product = category == SceneCategory::ProductHero || rng.gen_bool(0.5);
        Self {
            mood,
            category,
            scene,
            lighting,
            surface,
            include_product,
        }
    }

    /// Render the image-generation prompt for `title`.
    pub fn prompt(&self, title: &str) -> String {
        let product_block = if self.include_product {
            format!("\n\nPRODUCT (must appear in frame):\n{PRODUCT_BRIEF}")
        } else {
            String::new()
        };
        format!(
            "Cover image for a blog post: \"{title}\"\n\n\
             SCENE: {}\nSURFACE: {}\nLIGHTING: {}{product_block}\n\n\
             VISUAL STYLE:\n\
             - Minimal luxury editorial, high-end skincare meets thoughtful design magazine\n\
             - Muted warm palette: cream (#FAF8F3), warm beige, soft black, honey gold accents\n\
             - No text overlays, no people, no faces\n\
             - Photographic realism, not illustration\n\
             - 16:9 aspect ratio, full bleed, no borders or vignette",
            self.scene, self.surface, self.lighting
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn moods_checked_in_order() {
        assert_eq!(detect_mood("A slow morning", ""), Mood::Mindfulness);
        assert_eq!(detect_mood("Morning habits", ""), Mood::Productivity);
        assert_eq!(detect_mood("Staying human with AI", ""), Mood::Philosophy);
        assert_eq!(detect_mood("Why beeswax", "from the hive"), Mood::Nature);
        assert_eq!(detect_mood("Chapped lips", ""), Mood::Skincare);
        assert_eq!(detect_mood("Gift guide", "for the holidays"), Mood::General);
    }

    #[test]
    fn ai_matches_only_as_a_word() {
        assert_eq!(detect_mood("Daily gift guide", ""), Mood::General);
        assert_eq!(detect_mood("Gifts in an AI age", ""), Mood::Philosophy);
    }

    #[test]
    fn excerpt_participates_in_classification() {
        assert_eq!(detect_mood("Gift guide", "a quiet pause"), Mood::Mindfulness);
    }

    #[test]
    fn plan_respects_mood_candidates() {
        let mut rng = StdRng::seed_from_u64(7);
        for mood in moods() {
            for _ in 0..50 {
                let plan = CoverPlan::choose(mood, &mut rng);
                assert!(mood.candidate_scenes().contains(&plan.category));
                assert!(plan.category.scenes().contains(&plan.scene));
                assert!(LIGHTING.contains(&plan.lighting));
                assert!(SURFACES.contains(&plan.surface));
                if plan.category == SceneCategory::ProductHero {
                    assert!(plan.include_product);
                }
            }
        }
    }

    #[test]
    fn same_seed_same_plan() {
        let a = CoverPlan::choose(Mood::General, &mut StdRng::seed_from_u64(42));
        let b = CoverPlan::choose(Mood::General, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn product_block_only_when_included() {
        let mut plan = CoverPlan {
            mood: Mood::Nature,
            category: SceneCategory::NaturalTexture,
            scene: NATURAL_TEXTURE[0],
            lighting: LIGHTING[0],
            surface: SURFACES[0],
            include_product: false,
        };
        let prompt = plan.prompt("Honey and lips");
        assert!(prompt.starts_with("Cover image for a blog post: \"Honey and lips\""));
        assert!(!prompt.contains("PRODUCT (must appear"));
        plan.include_product = true;
        assert!(plan.prompt("x").contains("JESSE A. EISENBALM"));
    }
}
