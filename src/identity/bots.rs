use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

/// Signatures of automated agents, matched case-insensitively anywhere in the string.
pub const DEFAULT_BOT_SIGNATURES: &[&str] = &[
	r"bot\b",
	r"crawl",
	r"spider",
	r"slurp",
	r"facebookexternalhit",
	r"headless",
	r"lighthouse",
	r"pingdom",
	r"^curl/",
	r"^wget/",
	r"python-requests",
	r"^java/",
];

lazy_static! {
	static ref DEFAULT_BOT_PATTERN: Regex = compile(DEFAULT_BOT_SIGNATURES.iter().copied()).unwrap();
}

fn compile<'a, I>(signatures: I) -> Result<Regex, regex::Error>
where
	I: IntoIterator<Item = &'a str>,
{
	let alternation: Vec<String> = signatures.into_iter().map(|s| format!("(?:{s})")).collect();
	RegexBuilder::new(&alternation.join("|")).case_insensitive(true).build()
}

/// Decides whether a raw identification string comes from an automated agent.
pub trait BotClassifier {
	fn is_bot(&self, raw: &str) -> bool;
}

#[derive(Debug, Clone)]
pub struct SignatureBotClassifier {
	pattern: Regex,
}

impl Default for SignatureBotClassifier {
	fn default() -> Self {
		Self {
			pattern: DEFAULT_BOT_PATTERN.clone(),
		}
	}
}

impl SignatureBotClassifier {
	/// Default signatures plus `extra` regex fragments.
	pub fn with_signatures<I, S>(extra: I) -> Result<Self, regex::Error>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let extra: Vec<S> = extra.into_iter().collect();
		let pattern = compile(
			DEFAULT_BOT_SIGNATURES
				.iter()
				.copied()
				.chain(extra.iter().map(AsRef::as_ref)),
		)?;
		Ok(Self { pattern })
	}
}

impl BotClassifier for SignatureBotClassifier {
	fn is_bot(&self, raw: &str) -> bool {
		self.pattern.is_match(raw)
	}
}

impl<F> BotClassifier for F
where
	F: Fn(&str) -> bool,
{
	fn is_bot(&self, raw: &str) -> bool {
		self(raw)
	}
}
