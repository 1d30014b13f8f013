//! spriter-atlas: sprite-sheet atlas data for renderers.
//!
//! Imports the line-oriented libgdx atlas text format and single-page
//! TexturePacker JSON, exposing a file-name → `{page, site}` lookup that
//! renderers combine with a resolved pose. Text export is a byte-compatible
//! round trip of text import.

use std::collections::BTreeMap;

use hashbrown::HashMap;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("texture packer json parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One texture page of the atlas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    pub name: String,
    pub w: i32,
    pub h: i32,
    pub format: String,
    pub min_filter: String,
    pub mag_filter: String,
    pub wrap_s: String,
    pub wrap_t: String,
}

impl Default for Page {
    fn default() -> Self {
        Page {
            name: String::new(),
            w: 0,
            h: 0,
            format: "RGBA8888".to_string(),
            min_filter: "linear".to_string(),
            mag_filter: "linear".to_string(),
            wrap_s: "clamp-to-edge".to_string(),
            wrap_t: "clamp-to-edge".to_string(),
        }
    }
}

/// One packed region, keyed by source file name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Site {
    pub page: usize,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    /// 0 = unrotated, -1 = quarter turn clockwise (atlas text),
    /// 1 = quarter turn counter-clockwise (TexturePacker).
    pub rotate: i32,
    pub offset_x: i32,
    pub offset_y: i32,
    pub original_w: i32,
    pub original_h: i32,
    pub index: i32,
}

impl Default for Site {
    fn default() -> Self {
        Site {
            page: 0,
            x: 0,
            y: 0,
            w: 0,
            h: 0,
            rotate: 0,
            offset_x: 0,
            offset_y: 0,
            original_w: 0,
            original_h: 0,
            index: -1,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Atlas {
    pub pages: Vec<Page>,
    pub sites: HashMap<String, Site>,
    /// Import order; drives export ordering.
    pub site_keys: Vec<String>,
}

impl Atlas {
    pub fn new() -> Atlas {
        Atlas::default()
    }

    pub fn clear(&mut self) {
        self.pages.clear();
        self.sites.clear();
        self.site_keys.clear();
    }

    pub fn site(&self, file_name: &str) -> Option<&Site> {
        self.sites.get(file_name)
    }

    pub fn page_of(&self, site: &Site) -> Option<&Page> {
        self.pages.get(site.page)
    }

    /// Import the line-oriented atlas text format. Pages are delimited by
    /// blank lines; unindented `size:`/`format:`/`filter:`/`repeat:` lines
    /// describe the page, two-space-indented lines describe the current
    /// site, and any other line opens a new page or site.
    pub fn import_atlas_text(&mut self, text: &str) {
        self.clear();

        let mut page: Option<usize> = None;
        let mut site: Option<String> = None;

        for line in text.lines() {
            if line.trim().is_empty() {
                page = None;
                site = None;
            } else if let Some(rest) = line.strip_prefix("size: ") {
                if let (Some(page_index), Some((w, h))) = (page, rest.split_once(',')) {
                    self.pages[page_index].w = parse_int(w);
                    self.pages[page_index].h = parse_int(h);
                }
            } else if let Some(rest) = line.strip_prefix("format: ") {
                if let Some(page_index) = page {
                    self.pages[page_index].format = rest.to_string();
                }
            } else if let Some(rest) = line.strip_prefix("filter: ") {
                if let (Some(page_index), Some((min, mag))) = (page, rest.split_once(',')) {
                    self.pages[page_index].min_filter = min.to_string();
                    self.pages[page_index].mag_filter = mag.to_string();
                }
            } else if let Some(rest) = line.strip_prefix("repeat: ") {
                if let Some(page_index) = page {
                    let wrap_s = rest == "x" || rest == "xy";
                    let wrap_t = rest == "y" || rest == "xy";
                    self.pages[page_index].wrap_s =
                        if wrap_s { "Repeat" } else { "ClampToEdge" }.to_string();
                    self.pages[page_index].wrap_t =
                        if wrap_t { "Repeat" } else { "ClampToEdge" }.to_string();
                }
            } else if let Some(rest) = line.strip_prefix("orig: ") {
                // Page-level orig is parsed but intentionally discarded.
                log::debug!("page orig line ignored: {rest}");
            } else if page.is_none() {
                self.pages.push(Page {
                    name: line.to_string(),
                    ..Page::default()
                });
                page = Some(self.pages.len() - 1);
            } else if let Some(rest) = line.strip_prefix("  rotate: ") {
                if let Some(site) = site.as_ref().and_then(|key| self.sites.get_mut(key)) {
                    site.rotate = if rest != "false" { -1 } else { 0 };
                }
            } else if let Some(rest) = line.strip_prefix("  xy: ") {
                if let (Some(site), Some((x, y))) = (
                    site.as_ref().and_then(|key| self.sites.get_mut(key)),
                    rest.split_once(", "),
                ) {
                    site.x = parse_int(x);
                    site.y = parse_int(y);
                }
            } else if let Some(rest) = line.strip_prefix("  size: ") {
                if let (Some(site), Some((w, h))) = (
                    site.as_ref().and_then(|key| self.sites.get_mut(key)),
                    rest.split_once(", "),
                ) {
                    site.w = parse_int(w);
                    site.h = parse_int(h);
                }
            } else if let Some(rest) = line.strip_prefix("  orig: ") {
                if let (Some(site), Some((w, h))) = (
                    site.as_ref().and_then(|key| self.sites.get_mut(key)),
                    rest.split_once(", "),
                ) {
                    site.original_w = parse_int(w);
                    site.original_h = parse_int(h);
                }
            } else if let Some(rest) = line.strip_prefix("  offset: ") {
                if let (Some(site), Some((x, y))) = (
                    site.as_ref().and_then(|key| self.sites.get_mut(key)),
                    rest.split_once(", "),
                ) {
                    site.offset_x = parse_int(x);
                    site.offset_y = parse_int(y);
                }
            } else if let Some(rest) = line.strip_prefix("  index: ") {
                if let Some(site) = site.as_ref().and_then(|key| self.sites.get_mut(key)) {
                    site.index = parse_int(rest);
                }
            } else {
                // New site line: finish the previous site first.
                if let Some(prev) = site.as_ref().and_then(|key| self.sites.get_mut(key)) {
                    if prev.original_w == 0 {
                        prev.original_w = prev.w;
                    }
                    if prev.original_h == 0 {
                        prev.original_h = prev.h;
                    }
                }
                let new_site = Site {
                    page: page.unwrap_or(0),
                    ..Site::default()
                };
                self.sites.insert(line.to_string(), new_site);
                self.site_keys.push(line.to_string());
                site = Some(line.to_string());
            }
        }
    }

    /// Export in the same text format; `import_atlas_text` output round
    /// trips byte for byte.
    pub fn export_atlas_text(&self) -> String {
        let mut lines: Vec<String> = Vec::new();

        for (page_index, page) in self.pages.iter().enumerate() {
            // Empty line denotes a new page.
            lines.push(String::new());
            lines.push(page.name.clone());
            lines.push(format!("size: {},{}", page.w, page.h));
            lines.push(format!("format: {}", page.format));
            lines.push(format!("filter: {},{}", page.min_filter, page.mag_filter));
            let repeat = if page.wrap_s == "Repeat" && page.wrap_t == "Repeat" {
                "xy"
            } else if page.wrap_s == "Repeat" {
                "x"
            } else if page.wrap_t == "Repeat" {
                "y"
            } else {
                "none"
            };
            lines.push(format!("repeat: {repeat}"));

            for site_key in &self.site_keys {
                let site = &self.sites[site_key];
                if site.page != page_index {
                    continue;
                }
                lines.push(site_key.clone());
                lines.push(format!(
                    "  rotate: {}",
                    if site.rotate != 0 { "true" } else { "false" }
                ));
                lines.push(format!("  xy: {}, {}", site.x, site.y));
                lines.push(format!("  size: {}, {}", site.w, site.h));
                lines.push(format!("  orig: {}, {}", site.original_w, site.original_h));
                lines.push(format!("  offset: {}, {}", site.offset_x, site.offset_y));
                lines.push(format!("  index: {}", site.index));
            }
        }

        lines.join("\n")
    }

    /// Import a single-page TexturePacker JSON export.
    pub fn import_tps_text(&mut self, text: &str) -> Result<(), AtlasError> {
        self.clear();
        self.import_tps_text_page(text, 0)
    }

    /// Import one TexturePacker JSON page into the given page slot.
    pub fn import_tps_text_page(
        &mut self,
        text: &str,
        page_index: usize,
    ) -> Result<(), AtlasError> {
        let tps: TpsJson = serde_json::from_str(text)?;

        if let Some(meta) = tps.meta {
            if self.pages.len() <= page_index {
                self.pages.resize_with(page_index + 1, Page::default);
            }
            let page = &mut self.pages[page_index];
            *page = Page::default();
            page.w = meta.size.w;
            page.h = meta.size.h;
            page.name = meta.image;
        }

        for (name, frame) in tps.frames {
            let mut site = Site {
                page: page_index,
                x: frame.frame.x,
                y: frame.frame.y,
                w: frame.frame.w,
                h: frame.frame.h,
                // TexturePacker rotation is a quarter turn the other way.
                rotate: if frame.rotated { 1 } else { 0 },
                ..Site::default()
            };
            if let Some(source) = &frame.sprite_source_size {
                site.offset_x = source.x;
                site.offset_y = source.y;
            }
            site.original_w = frame.source_size.as_ref().map(|s| s.w).unwrap_or(0);
            site.original_h = frame.source_size.as_ref().map(|s| s.h).unwrap_or(0);
            if site.original_w == 0 {
                site.original_w = site.w;
            }
            if site.original_h == 0 {
                site.original_h = site.h;
            }
            if !self.sites.contains_key(&name) {
                self.site_keys.push(name.clone());
            }
            self.sites.insert(name, site);
        }

        Ok(())
    }
}

fn parse_int(text: &str) -> i32 {
    text.trim().parse().unwrap_or(0)
}

// ----- TexturePacker JSON schema (serde) -----

#[derive(Debug, Deserialize)]
struct TpsJson {
    meta: Option<TpsMeta>,
    #[serde(default)]
    frames: BTreeMap<String, TpsFrame>,
}

#[derive(Debug, Deserialize)]
struct TpsMeta {
    size: TpsSize,
    image: String,
}

#[derive(Debug, Deserialize)]
struct TpsSize {
    w: i32,
    h: i32,
}

#[derive(Debug, Deserialize)]
struct TpsFrame {
    frame: TpsRect,
    #[serde(default)]
    rotated: bool,
    #[serde(rename = "spriteSourceSize")]
    sprite_source_size: Option<TpsRect>,
    #[serde(rename = "sourceSize")]
    source_size: Option<TpsSize>,
}

#[derive(Debug, Deserialize)]
struct TpsRect {
    x: i32,
    y: i32,
    #[serde(default)]
    w: i32,
    #[serde(default)]
    h: i32,
}
