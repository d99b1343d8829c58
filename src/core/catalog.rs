//! # Menu Catalog
//!
//! Static recommendation table and menu grid. Nothing here is created or
//! destroyed at runtime; the UI only borrows `'static` slices.
//!
//! ```text
//! EmotionLabel ──recommendations_for()──▶ &[RecommendationEntry; 2]
//!                                          ├── image_ref
//!                                          ├── title / subtitle
//!                                          └── bullets: [[Fragment]]
//! ```

use crate::core::emotion::EmotionLabel;

/// One run of styled text inside a bullet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    Strong(&'static str),
    Plain(&'static str),
}

impl Fragment {
    pub fn text(&self) -> &'static str {
        match self {
            Fragment::Strong(s) | Fragment::Plain(s) => s,
        }
    }
}

/// A bullet is an ordered run of fragments.
pub type RichText = &'static [Fragment];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationEntry {
    pub image_ref: &'static str,
    pub title: &'static str,
    pub subtitle: Option<&'static str>,
    pub bullets: &'static [RichText],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub image_ref: &'static str,
    pub name: &'static str,
}

/// Plain text of a bullet, fragments concatenated.
pub fn plain_text(bullet: RichText) -> String {
    bullet.iter().map(Fragment::text).collect()
}

use Fragment::{Plain, Strong};

const SADNESS: &[RecommendationEntry] = &[
    RecommendationEntry {
        image_ref: "/images/mocha.png",
        title: "White Chocolate Mocha",
        subtitle: None,
        bullets: &[
            &[
                Strong("Sweetness"),
                Plain(" – activates the brain's dopamine reward pathways, giving an immediate sense of pleasure and comfort."),
            ],
            &[
                Strong("Creamy texture"),
                Plain(" – provides a soothing mouthfeel that promotes relaxation and a sense of warmth."),
            ],
            &[
                Strong("Warm temperature"),
                Plain(" – stimulates the parasympathetic nervous system, lowering stress hormones and helping the body relax."),
            ],
            &[
                Strong("Moderate caffeine"),
                Plain(" – offers a mild alertness lift without overwhelming stimulation, helping you feel gently energized as your mood improves."),
            ],
        ],
    },
    RecommendationEntry {
        image_ref: "/images/baked_apple_croissant.png",
        title: "Baked Apple Croissant",
        subtitle: None,
        bullets: &[
            &[
                Strong("Sweet cinnamon-apple filling"),
                Plain(" – delivers comforting flavors that can enhance serotonin activity and gently lift mood."),
            ],
            &[
                Strong("Spiced aromas (cinnamon, apple)"),
                Plain(" – promote relaxation and a sense of calm through their naturally soothing scent compounds."),
            ],
            &[
                Strong("Buttery layers"),
                Plain(" – provide a rich, creamy mouthfeel that feels indulgent and psychologically comforting."),
            ],
            &[
                Strong("Carbohydrates with a little fat"),
                Plain(" – help increase tryptophan availability, supporting serotonin production and easing sadness."),
            ],
        ],
    },
];

const ANGER: &[RecommendationEntry] = &[
    RecommendationEntry {
        image_ref: "/images/passion_tea.png",
        title: "Iced Passion Tango Herbal Tea",
        subtitle: None,
        bullets: &[
            &[
                Strong("Caffeine-free herbal blend"),
                Plain(" – avoids stimulant effects, helping reduce physiological arousal and allowing the body to relax."),
            ],
            &[
                Strong("Cool temperature"),
                Plain(" – provides a mild cooling effect that can lower core body temperature and help calm anger."),
            ],
            &[
                Strong("Tart-fruity hibiscus and lemongrass"),
                Plain(" – deliver a refreshing sensory reset that can interrupt the cycle of tension."),
            ],
            &[
                Strong("Aromatic herbs"),
                Plain(" – subtle floral and citrus notes promote a sense of calm through soothing scent compounds."),
            ],
        ],
    },
    RecommendationEntry {
        image_ref: "/images/cheese_protein_box.png",
        title: "Cheese Trio Protein Box",
        subtitle: None,
        bullets: &[
            &[
                Strong("High-quality protein from cheese"),
                Plain(" – supports steady production of neurotransmitters like serotonin and dopamine, helping regulate mood."),
            ],
            &[
                Strong("Healthy fats from cheese and nuts"),
                Plain(" – slow glucose absorption, preventing blood-sugar spikes that can heighten irritability."),
            ],
            &[
                Strong("Balanced macronutrients"),
                Plain(" – promote satiety and stable energy, reducing the physical agitation that can accompany anger."),
            ],
            &[
                Strong("Chilled serving temperature"),
                Plain(" – offers a mild cooling effect that can help lower physiological arousal and calm intense emotions."),
            ],
        ],
    },
];

const STRESSED: &[RecommendationEntry] = &[
    RecommendationEntry {
        image_ref: "/images/sausage_egg_bites.png",
        title: "Italian Sausage Egg Bites",
        subtitle: None,
        bullets: &[
            &[
                Strong("~15 g of high-quality protein"),
                Plain(" – helps stabilize blood sugar and maintain steady energy, preventing stress-related energy crashes."),
            ],
            &[
                Strong("Healthy fats from cheese and sausage"),
                Plain(" – provide slow-burning fuel that supports satiety and keeps cortisol spikes in check."),
            ],
            &[
                Strong("Warm temperature"),
                Plain(" – delivers gentle physical comfort and activates the parasympathetic nervous system, promoting relaxation."),
            ],
            &[
                Strong("Soft, custardy texture"),
                Plain(" – adds a soothing mouthfeel that helps you feel more grounded during stressful moments."),
            ],
        ],
    },
    RecommendationEntry {
        image_ref: "/images/Iced Pecan Crunch Oatmilk Latte.png",
        title: "Iced Pecan Crunch Oatmilk Latte",
        subtitle: None,
        bullets: &[
            &[
                Strong("Sweet, nutty flavors"),
                Plain(" – offer comfort and activate the brain's reward pathways, helping reduce stress."),
            ],
            &[
                Strong("Oat milk's beta-glucan fiber"),
                Plain(" – supports steady blood sugar, preventing energy dips that can heighten stress."),
            ],
            &[
                Strong("Moderate caffeine"),
                Plain(" – delivers a gentle boost in alertness without overstimulation, helping maintain focus under pressure."),
            ],
            &[
                Strong("Light crunch topping"),
                Plain(" – adds a pleasant sensory contrast, creating a small moment of mindful enjoyment that can interrupt stressful thoughts."),
            ],
        ],
    },
];

const CALM: &[RecommendationEntry] = &[
    RecommendationEntry {
        image_ref: "/images/matcha.png",
        title: "Iced Matcha Green Tea Latte",
        subtitle: None,
        bullets: &[
            &[
                Strong("L-theanine in matcha"),
                Plain(" – increases alpha brain-wave activity, promoting relaxed alertness and mental clarity."),
            ],
            &[
                Strong("Moderate natural caffeine (~80 mg in a grande)"),
                Plain(" – gives a gentle energy lift without overstimulation, helping maintain a balanced, tranquil state."),
            ],
            &[
                Strong("Smooth, lightly sweet flavor"),
                Plain(" – supports a serene yet focused mood, complementing a calm mindset."),
            ],
            &[
                Strong("Antioxidants (catechins)"),
                Plain(" – help reduce oxidative stress, supporting overall physical well-being while you stay relaxed."),
            ],
        ],
    },
    RecommendationEntry {
        image_ref: "/images/foraccia.png",
        title: "Warm Tomato & Mozzarella on Focaccia",
        subtitle: None,
        bullets: &[
            &[
                Strong("Complex carbohydrates"),
                Plain(" – release energy slowly, keeping blood sugar steady and supporting a stable, tranquil mood."),
            ],
            &[
                Strong("Moderate protein from mozzarella"),
                Plain(" – helps maintain sustained energy and supports neurotransmitter balance for continued calm."),
            ],
            &[
                Strong("Savory basil–tomato flavors"),
                Plain(" – provide balanced, satisfying taste without excess sugar, avoiding sudden spikes in energy or mood."),
            ],
            &[
                Strong("Soft focaccia texture"),
                Plain(" – adds a soothing mouthfeel that complements a peaceful, centered state."),
            ],
        ],
    },
];

const HAPPY: &[RecommendationEntry] = &[
    RecommendationEntry {
        image_ref: "/images/raccoon_cake_pop.png",
        title: "Raccoon Cake Pop",
        subtitle: None,
        bullets: &[
            &[
                Strong("Sweet flavor"),
                Plain(" – stimulates dopamine release in the brain's reward pathways, helping sustain feelings of joy."),
            ],
            &[
                Strong("Playful raccoon design"),
                Plain(" – adds visual novelty and fun, reinforcing positive emotions and enhancing enjoyment."),
            ],
            &[
                Strong("Small portion size"),
                Plain(" – provides a brief glucose boost for steady energy without an energy crash."),
            ],
            &[
                Strong("Creamy cake texture"),
                Plain(" – offers a soft, indulgent mouthfeel that complements a cheerful mood."),
            ],
        ],
    },
    RecommendationEntry {
        image_ref: "/images/strawberry_lemonade.png",
        title: "Iced Strawberry Açaí Lemonade Refresher",
        subtitle: None,
        bullets: &[
            &[
                Strong("Bright berry flavors"),
                Plain(" – reinforce positive affect through lively, uplifting taste."),
            ],
            &[
                Strong("Natural caffeine (~45 mg from green-coffee extract)"),
                Plain(" – provides a gentle alertness boost without the jitteriness of stronger coffee."),
            ],
            &[
                Strong("Cool, refreshing temperature"),
                Plain(" – offers a pleasant sensory lift that helps sustain upbeat energy."),
            ],
            &[
                Strong("Balanced sweetness"),
                Plain(" – delivers a quick glucose boost that supports continued positive energy without an energy crash."),
            ],
        ],
    },
];

const CURIOUS: &[RecommendationEntry] = &[
    RecommendationEntry {
        image_ref: "/images/pecan_cortado.png",
        title: "Pecan Oatmilk Cortado",
        subtitle: Some("(hot, sweet)"),
        bullets: &[
            &[
                Strong("New pecan flavor"),
                Plain(" – offers a sense of novelty that satisfies curiosity and encourages exploration."),
            ],
            &[
                Strong("Bold espresso with creamy oat milk"),
                Plain(" – creates a striking contrast of strong and smooth, rewarding adventurous taste buds."),
            ],
            &[
                Strong("Natural oat-based beta-glucan fiber"),
                Plain(" – helps steady blood sugar, supporting clear, focused thinking while you explore."),
            ],
            &[
                Strong("Moderate caffeine"),
                Plain(" – provides a gentle mental lift that fuels inquisitiveness without overstimulation."),
            ],
        ],
    },
    RecommendationEntry {
        image_ref: "/images/falafel_pockets.png",
        title: "Spicy Falafel Pockets",
        subtitle: None,
        bullets: &[
            &[
                Strong("Capsaicin from chili"),
                Plain(" – gently raises alertness through TRPV1 activation, sharpening focus for exploration."),
            ],
            &[
                Strong("Plant protein and fiber from chickpeas"),
                Plain(" – help keep blood sugar steady, supporting sustained energy for inquisitive activities."),
            ],
            &[
                Strong("Crisp-soft texture contrast"),
                Plain(" – adds sensory variety that matches a curious mood."),
            ],
            &[
                Strong("Warm temperature"),
                Plain(" – offers comforting balance to the stimulating spices, keeping curiosity enjoyable without overwhelm."),
            ],
        ],
    },
];

/// Recommendations for a mood, in display order. Total over the enum.
pub fn recommendations_for(label: EmotionLabel) -> &'static [RecommendationEntry] {
    match label {
        EmotionLabel::Sadness => SADNESS,
        EmotionLabel::Anger => ANGER,
        EmotionLabel::Stressed => STRESSED,
        EmotionLabel::Calm => CALM,
        EmotionLabel::Happy => HAPPY,
        EmotionLabel::Curious => CURIOUS,
    }
}

/// Same as [`recommendations_for`] but keyed by the raw service string.
/// Unknown or empty strings get the Calm set.
pub fn recommendations_for_raw(raw: &str) -> &'static [RecommendationEntry] {
    recommendations_for(EmotionLabel::parse(raw))
}

/// The full menu grid, in display order.
pub const MENU_ITEMS: &[MenuItem] = &[
    MenuItem {
        image_ref: "/images/mocha.png",
        name: "White Chocolate Mocha",
    },
    MenuItem {
        image_ref: "/images/passion_tea.png",
        name: "Iced Passion Tango Herbal Tea",
    },
    MenuItem {
        image_ref: "/images/Iced Pecan Crunch Oatmilk Latte.png",
        name: "Iced Pecan Crunch Oatmilk Latte",
    },
    MenuItem {
        image_ref: "/images/matcha.png",
        name: "Iced Matcha Green Tea Latte",
    },
    MenuItem {
        image_ref: "/images/strawberry_lemonade.png",
        name: "Strawberry Açaí Lemonade Refresher",
    },
    MenuItem {
        image_ref: "/images/pecan_cortado.png",
        name: "Pecan Oatmilk Cortado",
    },
    MenuItem {
        image_ref: "/images/baked_apple_croissant.png",
        name: "Baked Apple Croissant",
    },
    MenuItem {
        image_ref: "/images/cheese_protein_box.png",
        name: "Cheese Trio Protein Box",
    },
    MenuItem {
        image_ref: "/images/sausage_egg_bites.png",
        name: "Italian Sausage Egg Bites",
    },
    MenuItem {
        image_ref: "/images/foraccia.png",
        name: "Warm Tomato & Mozzarella on Focaccia",
    },
    MenuItem {
        image_ref: "/images/raccoon_cake_pop.png",
        name: "Raccoon Cake Pop",
    },
    MenuItem {
        image_ref: "/images/falafel_pockets.png",
        name: "Spicy Falafel Pockets",
    },
];
