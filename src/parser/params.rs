//! Script `param(...)` block reader and syntax synthesis.

use super::ExtractError;
use crate::model::{Parameter, Syntax};
use regex::Regex;
use std::sync::LazyLock;

static RE_PARAM_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bparam[[:space:]]*\(").unwrap());

static RE_CMDLET_BINDING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[[[:space:]]*CmdletBinding\b").unwrap());

static RE_PARAMETER_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^[[:space:]]*Parameter[[:space:]]*\((.*)\)[[:space:]]*$").unwrap());

static RE_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\$([[:word:]]+)[[:space:]]*(?:=(.*))?$").unwrap());

static RE_TRUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\$true|1)$").unwrap());

/// Declared parameters plus whether the script is an advanced script.
#[derive(Debug, Default)]
pub struct ParamBlock {
    pub parameters: Vec<Parameter>,
    pub advanced: bool,
}

/// Find and read the script-level `param(...)` block.
///
/// Returns `Ok(None)` when the script declares no parameters block.
pub fn parse(source: &str) -> Result<Option<ParamBlock>, ExtractError> {
    let code = strip_comments(source);

    let Some(m) = RE_PARAM_KEYWORD.find(&code) else {
        return Ok(None);
    };
    let preamble = &code[..m.start()];
    if !is_script_preamble(preamble) {
        return Ok(None);
    }

    let open = m.end() - 1;
    let Some(inner) = balanced(&code[open..]) else {
        let line = code[..open].matches('\n').count() + 1;
        return Err(ExtractError::UnterminatedParamBlock { line });
    };

    let mut advanced = RE_CMDLET_BINDING.is_match(preamble);
    let mut declared = Vec::new();
    for chunk in split_top_level(inner, ',') {
        if let Some(decl) = parse_declaration(chunk) {
            advanced |= decl.has_parameter_attr;
            declared.push(decl);
        }
    }

    let any_position = declared.iter().any(|d| d.position.is_some());
    let mut ordinal = 0;
    let parameters = declared
        .into_iter()
        .map(|d| {
            let is_switch = d.type_name == "SwitchParameter";
            let position = match d.position {
                Some(p) => p,
                None if !any_position && !is_switch => {
                    ordinal += 1;
                    (ordinal - 1).to_string()
                }
                None => "named".to_string(),
            };
            Parameter {
                name: d.name,
                description: String::new(),
                parameter_value: if is_switch {
                    String::new()
                } else {
                    d.type_name.clone()
                },
                type_name: d.type_name,
                default_value: d.default_value,
                pipeline_input: d.pipeline_input,
                position,
                required: d.mandatory.to_string(),
            }
        })
        .collect();

    Ok(Some(ParamBlock {
        parameters,
        advanced,
    }))
}

/// Build the invocation signature, e.g.
/// `Get-Widget.ps1 [-Path] <String> [-Force] [<CommonParameters>]`.
pub fn synthesize_syntax(file_name: &str, block: &ParamBlock) -> Syntax {
    let mut positional: Vec<(u32, &Parameter)> = Vec::new();
    let mut named: Vec<&Parameter> = Vec::new();
    for param in &block.parameters {
        match param.position.parse::<u32>() {
            Ok(n) => positional.push((n, param)),
            Err(_) => named.push(param),
        }
    }
    positional.sort_by_key(|(n, _)| *n);

    let mut parts: Vec<String> = Vec::new();
    for (_, param) in &positional {
        let mandatory = param.required == "true";
        let usage = if param.type_name == "SwitchParameter" {
            format!("-{}", param.name)
        } else {
            format!("[-{}] <{}>", param.name, param.type_name)
        };
        parts.push(if mandatory { usage } else { format!("[{}]", usage) });
    }
    for param in named {
        let mandatory = param.required == "true";
        let usage = if param.type_name == "SwitchParameter" {
            format!("-{}", param.name)
        } else {
            format!("-{} <{}>", param.name, param.type_name)
        };
        parts.push(if mandatory { usage } else { format!("[{}]", usage) });
    }
    if block.advanced {
        parts.push("[<CommonParameters>]".to_string());
    }

    let text = if parts.is_empty() {
        file_name.to_string()
    } else {
        format!("{} {}", file_name, parts.join(" "))
    };
    Syntax { text }
}

// -- Declarations -------------------------------------------------------------

struct Declaration {
    name: String,
    type_name: String,
    default_value: String,
    mandatory: bool,
    position: Option<String>,
    pipeline_input: String,
    has_parameter_attr: bool,
}

/// Read one comma-separated entry of the param block:
/// attributes, an optional type literal, `$Name`, optional `= default`.
fn parse_declaration(chunk: &str) -> Option<Declaration> {
    let mut rest = chunk.trim();
    let mut attributes = Vec::new();
    while rest.starts_with('[') {
        let inner = balanced(rest)?;
        attributes.push(inner);
        rest = rest[inner.len() + 2..].trim_start();
    }

    let caps = RE_VARIABLE.captures(rest.trim_end())?;
    let mut decl = Declaration {
        name: caps[1].to_string(),
        type_name: "Object".to_string(),
        default_value: caps
            .get(2)
            .map(|m| unquote(m.as_str().trim()).to_string())
            .unwrap_or_default(),
        mandatory: false,
        position: None,
        pipeline_input: "false".to_string(),
        has_parameter_attr: false,
    };

    let mut by_value = false;
    let mut by_property = false;
    for attr in attributes {
        if let Some(caps) = RE_PARAMETER_ATTR.captures(attr) {
            decl.has_parameter_attr = true;
            for arg in split_top_level(&caps[1], ',') {
                let (key, value) = match arg.split_once('=') {
                    Some((k, v)) => (k.trim(), Some(v.trim())),
                    None => (arg.trim(), None),
                };
                let enabled = value.map_or(true, |v| RE_TRUE.is_match(v));
                match key.to_lowercase().as_str() {
                    "mandatory" => decl.mandatory = enabled,
                    "position" => decl.position = value.map(str::to_string),
                    "valuefrompipeline" => by_value = enabled,
                    "valuefrompipelinebypropertyname" => by_property = enabled,
                    _ => {}
                }
            }
        } else if !attr.contains('(') {
            decl.type_name = display_type_name(attr);
        }
    }

    decl.pipeline_input = match (by_value, by_property) {
        (true, true) => "true (ByValue, ByPropertyName)",
        (true, false) => "true (ByValue)",
        (false, true) => "true (ByPropertyName)",
        (false, false) => "false",
    }
    .to_string();

    Some(decl)
}

/// Map a type literal to the name help output shows for it.
fn display_type_name(literal: &str) -> String {
    let literal = literal.trim();
    let (base, suffix) = match literal.strip_suffix("[]") {
        Some(base) => (base.trim(), "[]"),
        None => (literal, ""),
    };
    let short = base.rsplit('.').next().unwrap_or(base);
    let name = match short.to_lowercase().as_str() {
        "string" => "String",
        "int" | "int32" => "Int32",
        "long" | "int64" => "Int64",
        "bool" | "boolean" => "Boolean",
        "switch" | "switchparameter" => "SwitchParameter",
        "double" => "Double",
        "float" | "single" => "Single",
        "decimal" => "Decimal",
        "char" => "Char",
        "byte" => "Byte",
        "datetime" => "DateTime",
        "timespan" => "TimeSpan",
        "guid" => "Guid",
        "uri" => "Uri",
        "version" => "Version",
        "hashtable" => "Hashtable",
        "array" => "Array",
        "object" => "Object",
        "psobject" | "pscustomobject" => "PSObject",
        "pscredential" => "PSCredential",
        "securestring" => "SecureString",
        "scriptblock" => "ScriptBlock",
        "xml" => "XmlDocument",
        _ => short,
    };
    format!("{}{}", name, suffix)
}

fn unquote(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

// -- Scanning helpers ---------------------------------------------------------

/// Only attributes, `using` statements and whitespace may precede the
/// script-level param block.
fn is_script_preamble(prefix: &str) -> bool {
    let mut rest = prefix.trim_start();
    while !rest.is_empty() {
        if rest.starts_with('[') {
            match balanced(rest) {
                Some(inner) => rest = rest[inner.len() + 2..].trim_start(),
                None => return false,
            }
        } else if rest.get(..6).is_some_and(|p| p.eq_ignore_ascii_case("using ")) {
            rest = rest.split_once('\n').map_or("", |(_, tail)| tail).trim_start();
        } else {
            return false;
        }
    }
    true
}

/// Given text starting with an opening bracket, return the text between it
/// and its matching closer. Quotes are respected.
fn balanced(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, ch) in text.char_indices() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' => quote = Some(ch),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[1..i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on `sep` where it is outside quotes and brackets.
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' => quote = Some(ch),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Blank out block and line comments, keeping line structure and quoted text.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut in_block = false;
    for line in source.lines() {
        let mut quote: Option<char> = None;
        let mut chars = line.char_indices();
        while let Some((i, ch)) = chars.next() {
            if in_block {
                if line[i..].starts_with("#>") {
                    in_block = false;
                    chars.next();
                }
                continue;
            }
            if let Some(q) = quote {
                if ch == q {
                    quote = None;
                }
                out.push(ch);
                continue;
            }
            match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    out.push(ch);
                }
                '<' if line[i..].starts_with("<#") => {
                    in_block = true;
                    chars.next();
                }
                '#' => break,
                _ => out.push(ch),
            }
        }
        out.push('\n');
    }
    out
}
