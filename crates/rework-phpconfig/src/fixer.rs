//! Importer for `.php-cs-fixer.php`
//!
//! Reads the Finder chain (`in`, `exclude`, `notPath`, `name`, `notName`,
//! `ignoreDotFiles`, `ignoreVCS`) and the Config chain (`setRiskyAllowed`,
//! `setRules`).

use rework_core::logging;
use rework_core::{
    Configuration, OptionValue, PathRule, RuleOptions, RuleOverride, RuleSetReference, Tool,
};

use crate::source::{find_calls, Call};
use crate::value::{parse_arguments, Argument, PhpValue};
use crate::{resolve_path, ImportError};

const CALLS: &[&str] = &[
    "in",
    "exclude",
    "notPath",
    "name",
    "notName",
    "ignoreDotFiles",
    "ignoreVCS",
    "setRiskyAllowed",
    "setRules",
];

/// Finder state collected before directories are known
#[derive(Default)]
struct Finder {
    dirs: Vec<String>,
    excluded: Vec<String>,
}

/// Build a configuration from comment-free `.php-cs-fixer.php` source
pub fn import(content: &str, dir: &str) -> Result<Configuration, ImportError> {
    let mut config = Configuration::new(Tool::Fixer);
    config.options.ignore_dot_files = true;
    config.options.ignore_vcs = true;

    let mut finder = Finder::default();
    for call in find_calls(content, CALLS)? {
        let args = parse_arguments(&call.args, dir)?;
        apply_call(&mut config, &mut finder, &call, &args, dir)?;
    }

    if finder.dirs.is_empty() {
        finder.dirs.push(dir.to_string());
    }

    // exclude() and notPath() are relative to every in() directory
    let skips: Vec<String> = finder
        .excluded
        .iter()
        .flat_map(|excluded| {
            finder
                .dirs
                .iter()
                .map(move |root| format!("{}/{}", root.trim_end_matches('/'), excluded))
        })
        .collect();

    config.paths.insert(0, PathRule::include(finder.dirs));
    if !skips.is_empty() {
        config.paths.push(PathRule::skip(skips));
    }

    Ok(config)
}

fn apply_call(
    config: &mut Configuration,
    finder: &mut Finder,
    call: &Call,
    args: &[Argument],
    dir: &str,
) -> Result<(), ImportError> {
    let value = match args.first() {
        Some(arg) => &arg.value,
        None => return Err(missing(call)),
    };

    match call.method.as_str() {
        "in" => {
            for text in texts(call, value)? {
                finder.dirs.push(resolve_path(&text, dir));
            }
        }
        "exclude" | "notPath" => {
            for text in texts(call, value)? {
                if is_regex(&text) {
                    logging::log(&format!("Ignoring regex {}('{}')", call.method, text));
                } else {
                    finder.excluded.push(text.trim_matches('/').to_string());
                }
            }
        }
        "name" | "notName" => {
            for text in texts(call, value)? {
                if is_regex(&text) {
                    logging::log(&format!("Ignoring regex {}('{}')", call.method, text));
                } else if call.method == "name" {
                    config.options.file_name_patterns.push(text);
                } else {
                    config.options.not_name_patterns.push(text);
                }
            }
        }
        "ignoreDotFiles" => config.options.ignore_dot_files = bool_arg(call, value)?,
        "ignoreVCS" => config.options.ignore_vcs = bool_arg(call, value)?,
        "setRiskyAllowed" => config.options.risky_allowed = bool_arg(call, value)?,
        "setRules" => apply_rules(config, call, value)?,
        _ => {}
    }
    Ok(())
}

/// `'@Preset' => true` selects a set, `'rule' => true` a rule, `false`
/// disables it and an array enables it with options
fn apply_rules(
    config: &mut Configuration,
    call: &Call,
    rules: &PhpValue,
) -> Result<(), ImportError> {
    for (key, value) in rules.entries() {
        let Some(name) = key.and_then(PhpValue::as_text) else {
            return Err(ImportError::InvalidFormat(format!(
                "{}() expects 'rule' => value entries",
                call.method
            )));
        };

        if name.starts_with('@') {
            match value {
                PhpValue::Bool(true) => config.sets.push(RuleSetReference::new(name)),
                _ => logging::log(&format!("Ignoring disabled preset {}", name)),
            }
            continue;
        }

        match value {
            PhpValue::Bool(true) => config.rules.push(name.into()),
            PhpValue::Bool(false) => config.overrides.push(RuleOverride::skip(name)),
            PhpValue::Array(_) => {
                let options = match value.to_option_value() {
                    Some(OptionValue::Map(map)) => map,
                    _ => RuleOptions::new(),
                };
                config.rules.push(name.as_str().into());
                config.overrides.push(RuleOverride::configure(name, options));
            }
            other => {
                return Err(ImportError::InvalidFormat(format!(
                    "rule '{}' has unsupported value {:?}",
                    name, other
                )))
            }
        }
    }
    Ok(())
}

/// Finder accepts `'/pattern/'` regexes wherever it accepts globs
fn is_regex(text: &str) -> bool {
    text.len() > 2 && text.starts_with('/') && text.ends_with('/')
}

fn texts(call: &Call, value: &PhpValue) -> Result<Vec<String>, ImportError> {
    value
        .entries()
        .into_iter()
        .map(|(_, v)| v.as_text().ok_or_else(|| missing(call)))
        .collect()
}

fn bool_arg(call: &Call, value: &PhpValue) -> Result<bool, ImportError> {
    value.as_bool().ok_or_else(|| {
        ImportError::InvalidFormat(format!("{}() expects a boolean", call.method))
    })
}

fn missing(call: &Call) -> ImportError {
    ImportError::InvalidFormat(format!("{}() is missing its argument", call.method))
}
