use lazy_static::lazy_static;
use regex::Regex;

use crate::identity::bots::BotClassifier;
use crate::identity::parsed::ParsedUserAgent;
use crate::identity::tables::IdentityConfig;
use crate::identity::UserAgentIdentity;
use crate::types::BrowserId;
use crate::version::Version;

lazy_static! {
	static ref SAMSUNG_TOKEN: Regex = Regex::new(r"SamsungBrowser/(\d+(?:\.\d+)*)").unwrap();
	static ref KAIOS_TOKEN: Regex = Regex::new(r"(?i)KAIOS/(\d+(?:\.\d+)*)").unwrap();
}

/// What a rule sees: the parsed string and the identity tables.
pub struct RuleContext<'a> {
	pub parsed: &'a ParsedUserAgent,
	pub config: &'a IdentityConfig,
}

/// One step of the identity cascade. The first rule whose predicate holds
/// owns the result, even when its resolver produces nothing.
pub struct IdentityRule {
	pub name: &'static str,
	pub applies: fn(&RuleContext<'_>) -> bool,
	pub resolve: fn(&RuleContext<'_>) -> Option<UserAgentIdentity>,
}

pub const RULES: &[IdentityRule] = &[
	IdentityRule {
		name: "ios",
		applies: |ctx| ctx.parsed.is_ios(),
		resolve: resolve_ios,
	},
	IdentityRule {
		name: "legacy_handheld",
		applies: is_legacy_handheld,
		resolve: |ctx| {
			let parsed = ctx.parsed;
			let version = parsed.browser.version().or_else(|| parsed.os.version())?;
			Some(UserAgentIdentity::new(BrowserId::Bb, version))
		},
	},
	IdentityRule {
		name: "fork",
		applies: |ctx| ctx.config.fork_for(ctx.parsed).is_some(),
		resolve: resolve_fork,
	},
	IdentityRule {
		name: "in_app",
		applies: |ctx| ctx.config.in_app_for(ctx.parsed).is_some(),
		resolve: |ctx| ctx.config.in_app_for(ctx.parsed).map(|rule| rule.identity.identity()),
	},
	IdentityRule {
		name: "family",
		applies: |_| true,
		resolve: resolve_family,
	},
];

/// Run the cascade. Returns the matching rule's name with its raw result.
pub fn evaluate(ctx: &RuleContext<'_>) -> Option<(&'static str, UserAgentIdentity)> {
	let rule = RULES.iter().find(|rule| (rule.applies)(ctx))?;
	(rule.resolve)(ctx).map(|identity| (rule.name, identity))
}

fn resolve_ios(ctx: &RuleContext<'_>) -> Option<UserAgentIdentity> {
	if ctx.parsed.browser.is("Opera Mini") {
		return Some(UserAgentIdentity::new(BrowserId::OpMini, Version::all()));
	}
	let version = ctx.parsed.os.version()?;
	Some(UserAgentIdentity::new(BrowserId::IosSaf, version))
}

fn is_legacy_handheld(ctx: &RuleContext<'_>) -> bool {
	let parsed = ctx.parsed;
	let vendor = parsed
		.device
		.vendor
		.as_deref()
		.is_some_and(|v| v.eq_ignore_ascii_case("BlackBerry"));
	vendor || parsed.os.is("BlackBerry") || parsed.os.is("RIM Tablet OS")
}

fn resolve_fork(ctx: &RuleContext<'_>) -> Option<UserAgentIdentity> {
	let fork = ctx.config.fork_for(ctx.parsed)?;
	let own = ctx
		.parsed
		.browser
		.version()
		.or_else(|| ctx.parsed.engine.version())?;
	Some(UserAgentIdentity::new(fork.upstream, fork.align(&own)))
}

fn resolve_family(ctx: &RuleContext<'_>) -> Option<UserAgentIdentity> {
	let parsed = ctx.parsed;

	if parsed.os.is("KaiOS") || parsed.ua_contains("kaios") {
		let version = parsed.os.version().or_else(|| token_version(&KAIOS_TOKEN, &parsed.ua))?;
		return Some(UserAgentIdentity::new(BrowserId::Kaios, version));
	}

	let Some(name) = parsed.browser_key() else {
		return engine_fallback(parsed);
	};

	if matches!(name.as_str(), "chrome webview" | "webview" | "android browser") {
		if let Some(version) = token_version(&SAMSUNG_TOKEN, &parsed.ua) {
			return Some(UserAgentIdentity::new(BrowserId::Samsung, version));
		}
	}

	let android = parsed.is_android();
	let browser = match name.as_str() {
		"chrome" | "chromium" | "chrome headless" | "headlesschrome" | "chrome webview" | "webview" => {
			if android {
				BrowserId::AndChr
			} else {
				BrowserId::Chrome
			}
		}
		"firefox" | "firefox mobile" => {
			if android {
				BrowserId::AndFf
			} else {
				BrowserId::Firefox
			}
		}
		"opera" => {
			if android {
				BrowserId::OpMob
			} else {
				BrowserId::Opera
			}
		}
		"opera mini" => return Some(UserAgentIdentity::new(BrowserId::OpMini, Version::all())),
		"opera mobi" | "opera mobile" => BrowserId::OpMob,
		"safari" | "mobile safari" => BrowserId::Safari,
		"edge" | "microsoft edge" => BrowserId::Edge,
		"ie" | "internet explorer" => BrowserId::Ie,
		"iemobile" | "ie mobile" => BrowserId::IeMob,
		"samsung browser" | "samsung internet" | "samsungbrowser" => BrowserId::Samsung,
		"uc browser" | "ucbrowser" => BrowserId::AndUc,
		"qq browser" | "qqbrowser" => BrowserId::AndQq,
		"baidu" | "baidu browser" | "baidubrowser" => BrowserId::Baidu,
		"blackberry" => BrowserId::Bb,
		"android browser" => {
			let version = parsed.os.version().or_else(|| parsed.browser.version())?;
			return Some(UserAgentIdentity::new(BrowserId::Android, version));
		}
		_ => return engine_fallback(parsed),
	};

	let version = parsed.browser.version()?;
	Some(UserAgentIdentity::new(browser, version))
}

/// Identity from the rendering engine alone.
fn engine_fallback(parsed: &ParsedUserAgent) -> Option<UserAgentIdentity> {
	let android = parsed.is_android();
	let engine = &parsed.engine;

	let (browser, engine_versioned) = if engine.is("Blink") {
		(if android { BrowserId::AndChr } else { BrowserId::Chrome }, true)
	} else if engine.is("Gecko") {
		(if android { BrowserId::AndFf } else { BrowserId::Firefox }, true)
	} else if engine.is("EdgeHTML") {
		(BrowserId::Edge, true)
	} else if engine.is("WebKit") {
		(BrowserId::Safari, false)
	} else if engine.is("Presto") {
		(BrowserId::Opera, false)
	} else {
		return None;
	};

	let version = if engine_versioned {
		engine.version().or_else(|| parsed.browser.version())
	} else {
		parsed.browser.version().or_else(|| engine.version())
	}?;
	Some(UserAgentIdentity::new(browser, version))
}

fn token_version(pattern: &Regex, ua: &str) -> Option<Version> {
	pattern
		.captures(ua)
		.and_then(|caps| caps.get(1))
		.map(|m| Version::new(m.as_str()))
}

/// Final pass over flagged automation: friendly crawlers get an evergreen
/// identity, everything else the conservative one.
pub fn bot_override<B>(parsed: &ParsedUserAgent, config: &IdentityConfig, classifier: &B) -> Option<UserAgentIdentity>
where
	B: BotClassifier + ?Sized,
{
	if !classifier.is_bot(&parsed.ua) {
		return None;
	}
	if config.bots.excluded_browsers.iter().any(|name| parsed.browser.is(name)) {
		return None;
	}
	let friendly = config.bots.friendly.iter().any(|name| parsed.ua_contains(name));
	let identity = if friendly {
		&config.bots.friendly_identity
	} else {
		&config.bots.default_identity
	};
	Some(identity.identity())
}
