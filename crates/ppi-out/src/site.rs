//! Static site: one page with a sparkline and bar per subject, reading the
//! report CSV in the browser.
//!
//! Uses Handlebars with two helpers:
//! - json: embed a value as a script-safe JSON literal
//! - default: value, or a fallback when missing

use handlebars::{Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{RenderError, Result};
use crate::palette;

const PAGE_TEMPLATE: &str = "profanity_power_index";
const PAGE_SOURCE: &str = include_str!("../templates/profanity_power_index.html.hbs");
const SCRIPT_SOURCE: &str = include_str!("../templates/profanity_power_index.js");
pub const SCRIPT_PATH: &str = "js/profanity_power_index.js";

const STOP_OFFSETS: [&str; 5] = ["0%", "25%", "50%", "75%", "100%"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub subjects: Vec<SubjectConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectConfig {
    /// Must match the `subject` column of the report
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// ColorBrewer scheme name, e.g. `Reds`
    pub colors: String,
    #[serde(default)]
    pub image: Option<String>,
    /// Anything else is passed to the template untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl SiteConfig {
    /// Parses JSON or YAML.
    pub fn parse(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| RenderError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectColors {
    pub sparkline: Vec<GradientStop>,
    pub barchart: BarColors,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradientStop {
    pub offset: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarColors {
    pub base: &'static str,
    pub hover: &'static str,
}

pub fn make_colors(subject: &SubjectConfig) -> Result<SubjectColors> {
    let scheme = palette::lookup(&subject.colors)
        .ok_or_else(|| RenderError::UnknownColorScheme(format!("{}_5", subject.colors)))?;
    Ok(SubjectColors {
        sparkline: STOP_OFFSETS
            .into_iter()
            .zip(scheme.colors)
            .map(|(offset, color)| GradientStop { offset, color })
            .collect(),
        barchart: BarColors {
            base: scheme.colors[3],
            hover: scheme.colors[4],
        },
    })
}

/// A subject as the page template sees it.
#[derive(Debug, Serialize)]
struct PageSubject<'a> {
    name: &'a str,
    /// Unique token for element ids and class names
    slug: String,
    display_name: &'a str,
    image: Option<&'a str>,
    colors: SubjectColors,
    #[serde(flatten)]
    extra: &'a BTreeMap<String, Value>,
}

pub struct SiteRenderer {
    handlebars: Handlebars<'static>,
}

impl SiteRenderer {
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_helper("json", Box::new(JsonHelper));
        handlebars.register_helper("default", Box::new(DefaultHelper));
        handlebars
            .register_template_string(PAGE_TEMPLATE, PAGE_SOURCE)
            .map_err(|e| RenderError::Template(e.to_string()))?;
        Ok(Self { handlebars })
    }

    /// Renders the page for `config`, pointing the script at `data_file`
    /// relative to the page.
    pub fn render(&self, config: &SiteConfig, data_file: &str) -> Result<String> {
        let mut taken = HashSet::new();
        let subjects = config
            .subjects
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let base = slugify(&s.name);
                let slug = if base.is_empty() || taken.contains(&base) {
                    format!("subject-{}", i + 1)
                } else {
                    base
                };
                taken.insert(slug.clone());
                Ok(PageSubject {
                    name: &s.name,
                    slug,
                    display_name: s.display_name.as_deref().unwrap_or(&s.name),
                    image: s.image.as_deref(),
                    colors: make_colors(s)?,
                    extra: &s.extra,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let data = json!({
            "subjects": subjects,
            "file_location": data_file,
            "script": SCRIPT_PATH,
        });
        self.handlebars
            .render(PAGE_TEMPLATE, &data)
            .map_err(|e| RenderError::Render(e.to_string()))
    }
}

/// Lower-cased ASCII letters and digits; every other run becomes one `-`.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.truncate(slug.trim_end_matches('-').len());
    slug
}

pub fn build_site(config: &SiteConfig, data_file: &str) -> Result<String> {
    SiteRenderer::new()?.render(config, data_file)
}

/// Writes `index.html`, the page script and a copy of the data file into
/// `output_dir`, creating it if needed. Returns the path of `index.html`.
pub fn write_site(output_dir: &Path, data_path: &Path, config: &SiteConfig) -> Result<PathBuf> {
    let data_name = data_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| RenderError::Config(format!("{} is not a file", data_path.display())))?;
    let page = build_site(config, data_name)?;

    if !output_dir.exists() {
        info!("{} does not exist. Creating.", output_dir.display());
    }
    fs::create_dir_all(output_dir)?;
    let script = output_dir.join(SCRIPT_PATH);
    if let Some(js_dir) = script.parent() {
        fs::create_dir_all(js_dir)?;
    }

    let data_copy = output_dir.join(data_name);
    if !same_file(data_path, &data_copy) {
        fs::copy(data_path, &data_copy)?;
    }
    fs::write(&script, SCRIPT_SOURCE)?;
    let index = output_dir.join("index.html");
    fs::write(&index, page)?;
    info!(subjects = config.subjects.len(), "Wrote {}.", index.display());
    Ok(index)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

// ============================================================================
// Custom Helpers
// ============================================================================

/// Serialize a value as JSON safe to place inside a `<script>` element
struct JsonHelper;

impl HelperDef for JsonHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let encoded = h
            .param(0)
            .and_then(|v| serde_json::to_string(v.value()).ok())
            .unwrap_or_else(|| "null".to_string());
        out.write(&encoded.replace("</", "<\\/"))?;
        Ok(())
    }
}

/// Default value helper
struct DefaultHelper;

impl HelperDef for DefaultHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let value = h.param(0).map(|v| v.value());
        let default = h.param(1).and_then(|v| v.value().as_str()).unwrap_or("");

        match value {
            Some(v) if !v.is_null() => match v.as_str() {
                Some(s) => out.write(&handlebars::html_escape(s))?,
                None => out.write(&v.to_string())?,
            },
            _ => out.write(&handlebars::html_escape(default))?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(colors: &str) -> SubjectConfig {
        SubjectConfig {
            name: "trump".into(),
            display_name: None,
            colors: colors.into(),
            image: None,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn test_make_colors_spreads_stops() {
        let colors = make_colors(&subject("Reds")).unwrap();
        let offsets: Vec<&str> = colors.sparkline.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, STOP_OFFSETS);
        assert_eq!(colors.sparkline[0].color, "#FEE5D9");
        assert_eq!(colors.barchart, BarColors { base: "#DE2D26", hover: "#A50F15" });
    }

    #[test]
    fn test_unknown_scheme() {
        let err = make_colors(&subject("Rainbow")).unwrap_err();
        assert!(matches!(err, RenderError::UnknownColorScheme(ref s) if s == "Rainbow_5"));
        assert_eq!(err.to_string(), "Rainbow_5 is not a supported color scheme.");
    }

    #[test]
    fn test_config_accepts_json_and_yaml() {
        let from_json = SiteConfig::parse(r#"{"subjects":[{"name":"biden","colors":"Blues"}]}"#).unwrap();
        let from_yaml = SiteConfig::parse("subjects:\n  - name: biden\n    colors: Blues\n").unwrap();
        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn test_config_keeps_extra_fields() {
        let config = SiteConfig::parse(
            r#"{"subjects":[{"name":"biden","colors":"Blues","party":"D"}]}"#,
        )
        .unwrap();
        assert_eq!(config.subjects[0].extra.get("party"), Some(&json!("D")));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Joe Biden"), "joe-biden");
        assert_eq!(slugify("  AOC!! "), "aoc");
        assert_eq!(slugify("Ренат"), "");
    }

    #[test]
    fn test_json_helper_escapes_script_close() {
        let renderer = SiteRenderer::new().unwrap();
        let out = renderer
            .handlebars
            .render_template("{{{json v}}}", &json!({ "v": "</script>" }))
            .unwrap();
        assert_eq!(out, r#""<\/script>""#);
    }

    #[test]
    fn test_default_helper() {
        let renderer = SiteRenderer::new().unwrap();
        let out = renderer
            .handlebars
            .render_template("{{default missing \"n/a\"}}|{{default here \"n/a\"}}", &json!({ "here": "x" }))
            .unwrap();
        assert_eq!(out, "n/a|x");
    }
}
