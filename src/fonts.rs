use anyhow::{Context, Result};
use eframe::egui;
use std::path::{Path, PathBuf};

const CJK_FONT_NAME: &str = "cjk";

/// System fonts able to render the Chinese labels, in preference order.
/// `.ttc` collections use their first face.
fn cjk_font_candidates() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = Vec::new();
    if cfg!(target_os = "windows") {
        let fonts = std::env::var("WINDIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Windows"))
            .join("Fonts");
        paths.extend(["msyhbd.ttc", "msyh.ttc", "simhei.ttf", "simsun.ttc"].map(|f| fonts.join(f)));
    } else if cfg!(target_os = "macos") {
        paths.extend(
            [
                "/System/Library/Fonts/PingFang.ttc",
                "/System/Library/Fonts/STHeiti Medium.ttc",
                "/Library/Fonts/Arial Unicode.ttf",
            ]
            .map(PathBuf::from),
        );
    } else {
        paths.extend(
            [
                "/usr/share/fonts/opentype/noto/NotoSansCJK-Bold.ttc",
                "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
                "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
                "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
                "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
                "/usr/share/fonts/wenquanyi/wqy-microhei/wqy-microhei.ttc",
            ]
            .map(PathBuf::from),
        );
    }
    paths
}

/// Font definitions with `font` appended as a fallback to both families.
pub fn definitions_with_fallback(font: egui::FontData) -> egui::FontDefinitions {
    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert(CJK_FONT_NAME.to_owned(), font);
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push(CJK_FONT_NAME.to_owned());
    }
    fonts
}

/// Read a font file and check that it parses, so a corrupt file is reported
/// here instead of failing inside the renderer.
fn load_font(path: &Path) -> Result<egui::FontData> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read font file {}", path.display()))?;
    ab_glyph::FontRef::try_from_slice_and_index(&bytes, 0)
        .with_context(|| format!("parse font file {}", path.display()))?;
    Ok(egui::FontData::from_owned(bytes))
}

/// First candidate that exists and loads. Unusable candidates are skipped;
/// the error of the last one is returned if none loads. `Ok(None)` when no
/// candidate exists.
fn first_usable_font(candidates: &[PathBuf]) -> Result<Option<(PathBuf, egui::FontData)>> {
    let mut last_error = None;
    for path in candidates.iter().filter(|p| p.exists()) {
        match load_font(path) {
            Ok(font) => return Ok(Some((path.clone(), font))),
            Err(e) => {
                tracing::warn!("skipping font: {e:#}");
                last_error = Some(e);
            }
        }
    }
    match last_error {
        Some(e) => Err(e),
        None => Ok(None),
    }
}

/// Install the first usable CJK font. Missing fonts only produce a warning;
/// fonts that exist but cannot be read or parsed are an error.
pub fn install_cjk_fonts(ctx: &egui::Context) -> Result<()> {
    let Some((path, font)) = first_usable_font(&cjk_font_candidates())? else {
        tracing::warn!("no CJK font found, course names may not render");
        return Ok(());
    };
    ctx.set_fonts(definitions_with_fallback(font));
    tracing::info!(font = %path.display(), "installed CJK font");
    Ok(())
}
