//! Technique Guide
//!
//! Static reference content for the guide panel, addressable by deep links
//! of the form `#guide-<section-id>`.

/// What kind of material a section covers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuideKind {
    /// A complete writing method
    Method,
    /// A comedian's working style
    Style,
    /// A single technique
    Technique,
}

impl GuideKind {
    /// Badge label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Method => "METHOD",
            Self::Style => "STYLE",
            Self::Technique => "TECHNIQUE",
        }
    }
}

/// A worked example
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GuideExample {
    /// The joke
    pub text: &'static str,
    /// Breakdown of how it works
    pub note: Option<&'static str>,
}

const fn example(text: &'static str) -> GuideExample {
    GuideExample { text, note: None }
}

const fn annotated(text: &'static str, note: &'static str) -> GuideExample {
    GuideExample {
        text,
        note: Some(note),
    }
}

/// Guide sections, in display order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GuideSection {
    /// Greg Dean's assumption / reinterpretation system
    GregDean,
    /// Leo Lins' mapping
    LeoLins,
    /// Premise, setup and punchline
    Structure,
    /// Callback
    Callback,
    /// Rule of three
    RuleOfThree,
    /// Pun
    Pun,
    /// Irony
    Irony,
    /// Misdirection
    Misdirection,
    /// Surprise
    Surprise,
    /// Dramatic irony
    DramaticIrony,
    /// Sarcasm
    Sarcasm,
}

impl GuideSection {
    /// Every section in display order
    pub const ALL: [GuideSection; 11] = [
        GuideSection::GregDean,
        GuideSection::LeoLins,
        GuideSection::Structure,
        GuideSection::Callback,
        GuideSection::RuleOfThree,
        GuideSection::Pun,
        GuideSection::Irony,
        GuideSection::Misdirection,
        GuideSection::Surprise,
        GuideSection::DramaticIrony,
        GuideSection::Sarcasm,
    ];

    /// Stable identifier used in links
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::GregDean => "greg-dean",
            Self::LeoLins => "leo-lins",
            Self::Structure => "structure",
            Self::Callback => "callback",
            Self::RuleOfThree => "rule-of-three",
            Self::Pun => "pun",
            Self::Irony => "irony",
            Self::Misdirection => "misdirection",
            Self::Surprise => "surprise",
            Self::DramaticIrony => "dramatic-irony",
            Self::Sarcasm => "sarcasm",
        }
    }

    /// Section with this identifier
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    /// Link fragment without the `#`
    #[must_use]
    pub fn anchor(self) -> String {
        format!("guide-{}", self.id())
    }

    /// Section named by a link or fragment such as `#guide-pun`
    #[must_use]
    pub fn from_link(link: &str) -> Option<Self> {
        let (_, fragment) = link.trim().rsplit_once('#')?;
        fragment.strip_prefix("guide-").and_then(Self::from_id)
    }

    /// Heading
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::GregDean => "The Greg Dean System",
            Self::LeoLins => "Mapping (Leo Lins)",
            Self::Structure => "Premise, Setup and Punchline",
            Self::Callback => "The Callback",
            Self::RuleOfThree => "Rule of Three",
            Self::Pun => "Pun",
            Self::Irony => "Irony",
            Self::Misdirection => "Misdirection",
            Self::Surprise => "Surprise",
            Self::DramaticIrony => "Dramatic Irony",
            Self::Sarcasm => "Sarcasm",
        }
    }

    /// Method, style or technique
    #[must_use]
    pub fn kind(self) -> GuideKind {
        match self {
            Self::GregDean => GuideKind::Method,
            Self::LeoLins => GuideKind::Style,
            _ => GuideKind::Technique,
        }
    }

    /// Explanatory paragraphs
    #[must_use]
    pub fn explanation(self) -> &'static [&'static str] {
        match self {
            Self::GregDean => &[
                "The most technical method in comedy. It rests on the Assumption (what the \
                 audience thinks will happen) and the Reinterpretation (what actually happens).",
                "Connector: the element in the setup that allows two meanings.",
                "Target: the wrong assumption the audience makes.",
            ],
            Self::LeoLins => &[
                "Exhaustive exploration. Before writing the joke you map every noun, verb and \
                 concept related to the subject.",
                "Mapping \"airplane\" gives: seat, turbine, parachute, price of a snack, crying \
                 child, fear of falling. The joke comes from linking two distant points of the map.",
            ],
            Self::Structure => &[
                "Premise: the idea or topic. The audience must understand it instantly.",
                "Setup: builds the assumption. Punchline: breaks it.",
            ],
            Self::Callback => &["A reference to something said earlier in the set."],
            Self::RuleOfThree => &["Pattern, pattern, rhythmic break."],
            Self::Pun => &["Exploiting the multiple meanings of a word."],
            Self::Irony => &["The gap between social expectation and reality."],
            Self::Misdirection => &[
                "Lead the audience to a logical conclusion and deliver an unexpected ending.",
            ],
            Self::Surprise => &[
                "An entirely unexpected element that interrupts the logical flow of the story.",
            ],
            Self::DramaticIrony => &[
                "The audience holds a crucial piece of information the character in the joke \
                 lacks, which creates comic tension.",
            ],
            Self::Sarcasm => &[
                "Irony used to mock or show contempt, usually by saying the opposite of what is \
                 meant in a pointed tone.",
            ],
        }
    }

    /// Worked examples
    #[must_use]
    pub fn examples(self) -> &'static [GuideExample] {
        const GREG_DEAN: &[GuideExample] = &[
            annotated(
                "I love making people smile... that's why I work at a laughing gas shop.",
                "Connector: \"making people smile\" (Assumption: charisma; Reinterpretation: chemistry).",
            ),
            annotated(
                "My grandfather died peacefully in his sleep... unlike the passengers on the bus he was driving.",
                "Connector: \"died peacefully\" (Assumption: a calm natural end; Reinterpretation: fatal negligence).",
            ),
            annotated(
                "I asked my girlfriend what she wanted for her birthday. She said \"something with diamonds\". So I gave her a deck of cards.",
                "Connector: \"something with diamonds\" (Assumption: expensive jewelry; Reinterpretation: the card suit).",
            ),
            annotated(
                "I told my doctor I broke my arm in two places. He told me to stop going to those places.",
                "Connector: \"places\" (Assumption: points on the body; Reinterpretation: locations).",
            ),
            annotated(
                "My wife told me to embrace my mistakes. So I hugged her.",
                "Connector: \"mistakes\" (Assumption: failures; Reinterpretation: the person who stands for them).",
            ),
        ];
        const LEO_LINS: &[GuideExample] = &[
            annotated(
                "Flying is the only situation where you pay a fortune to be locked into a seat smaller than your car's and pray the \"turbulence\" is just a drunk driver.",
                "Map: seat, high price, turbulence, fear, confinement.",
            ),
            annotated(
                "Marriage is the only contract where the termination clause is \"death\". Put that in a lease and the agent calls an asylum, but at the altar everyone throws rice.",
                "Map: contract, clause, altar, death, rice, termination.",
            ),
            annotated(
                "A packed bus at 6am is a social experiment. It's the only place you're pressed so close to a stranger that if he sneezes, you're the one wiping your nose.",
                "Map: crowding, stranger, hygiene, experiment, physical contact.",
            ),
            annotated(
                "Christmas is the only time of year you let a stranger dressed in red into your house to hand out presents. Any other month you'd call the police.",
                "Map: Christmas, strangers, red suit, presents, break-in, police.",
            ),
        ];
        const STRUCTURE: &[GuideExample] = &[
            example("Whenever I feel useless, I remember someone out there installs turn signals on luxury cars."),
            example("I hate the gym. It's the only place where everyone is sweating for a goal and you just want to go home and eat pizza."),
        ];
        const CALLBACK: &[GuideExample] = &[
            example("My cat still thinks I'm the guy who cleans his litter box as a hobby."),
            annotated(
                "And speaking of passwords that never work, my new router is so complicated I gave up and started reading books again.",
                "Assumes the set talked about struggling with technology earlier.",
            ),
        ];
        const RULE_OF_THREE: &[GuideExample] = &[
            example("The three hardest things to say: I love you, I'm sorry, and Worcestershire sauce."),
            example("There are three kinds of lies: lies, damned lies, and résumés."),
        ];
        const PUN: &[GuideExample] = &[
            example("Why was the coffee filing a police report? It got mugged."),
            example("I used to be a banker, but I lost interest."),
        ];
        const IRONY: &[GuideExample] = &[
            example("I love how people post #grateful while cursing at the driver next to them in traffic."),
            example("My gym has a sign that says \"Be the change you want to see in the world\". I just want to see less fat on my stomach, but sure."),
        ];
        const MISDIRECTION: &[GuideExample] = &[
            example("Last night a burglar broke in looking for money. I got out of bed and we searched together."),
            example("I'm a man of few words, but I'm very good at telling lies."),
        ];
        const SURPRISE: &[GuideExample] = &[
            example("My wife said I should be more affectionate. So now I hug her every time she's doing the dishes. She hates it, but I feel like a hero."),
            example("I saw a guy falling off a building, yelling \"It's not the ground that scares me, it's the sudden landing!\""),
        ];
        const DRAMATIC_IRONY: &[GuideExample] = &[
            example("The skydiving instructor shouting \"Relax, the reserve never fails!\" while he forgot to put on his own gear."),
            example("My boss gave me a raise and said \"You're a valuable employee!\" Shame he hasn't seen my simulation of his system failing next week."),
        ];
        const SARCASM: &[GuideExample] = &[
            example("Oh, you work 14 hours a day for minimum wage? What an amazing, balanced life. I'd love to be a corporate zombie too."),
            example("Sure, because nothing says \"serious professional\" like a video call with your cat walking across your head."),
        ];

        match self {
            Self::GregDean => GREG_DEAN,
            Self::LeoLins => LEO_LINS,
            Self::Structure => STRUCTURE,
            Self::Callback => CALLBACK,
            Self::RuleOfThree => RULE_OF_THREE,
            Self::Pun => PUN,
            Self::Irony => IRONY,
            Self::Misdirection => MISDIRECTION,
            Self::Surprise => SURPRISE,
            Self::DramaticIrony => DRAMATIC_IRONY,
            Self::Sarcasm => SARCASM,
        }
    }
}
