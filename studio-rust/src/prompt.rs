use crate::session::OutputFormat;
use genimage_sdk::AspectRatio;

/// Builds the generation prompt by direct template substitution.
pub(crate) fn logo_prompt(
    prompt: &str,
    style: &str,
    format: OutputFormat,
    negative_prompt: Option<&str>,
    aspect_ratio: Option<AspectRatio>,
) -> String {
    let mut text = format!(
        "A logo for \"{prompt}\", style: {style}. Vector, minimalist design, \
         high resolution, on a {} background.",
        format.background()
    );
    if let Some(ratio) = aspect_ratio {
        text.push_str(&format!(" Aspect ratio {}.", ratio.as_str()));
    }
    if let Some(negative) = negative_prompt {
        text.push_str(&format!(" Exclude the following elements: {negative}."));
    }
    text
}

/// Instruction for the description-synthesis call that folds reference
/// images and color intent into one natural-language prompt.
pub(crate) fn synthesis_prompt(prompt: &str, style: &str, colors: Option<&str>) -> String {
    let mut text = format!(
        "Study the attached reference images. Write one detailed prompt for an \
         image-generation model that designs a logo for \"{prompt}\" in the \
         {style} style, folding in the visual direction of the references."
    );
    if let Some(colors) = colors {
        text.push_str(&format!(" Use this color palette: {colors}."));
    }
    text.push_str(" Respond with the prompt text only.");
    text
}

/// Instruction for redrawing the current logo in a new style while keeping
/// the background treatment of the original format.
pub(crate) fn restyle_instruction(style: &str, format: OutputFormat) -> String {
    format!(
        "Redraw this logo in the {style} style. Keep the subject and \
         composition recognizable and preserve the {} background.",
        format.background()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logo_prompt_substitutes_all_inputs() {
        let text = logo_prompt(
            "Acme",
            "Classic",
            OutputFormat::Jpeg,
            Some("gradients"),
            Some(AspectRatio::Landscape),
        );
        assert!(text.contains("\"Acme\""));
        assert!(text.contains("style: Classic"));
        assert!(text.contains("clean white background"));
        assert!(text.contains("Aspect ratio 16:9"));
        assert!(text.contains("Exclude the following elements: gradients"));
    }

    #[test]
    fn png_prompts_ask_for_transparency() {
        let text = logo_prompt("Acme", "Minimal", OutputFormat::Png, None, None);
        assert!(text.contains("transparent background"));
        let restyle = restyle_instruction("Retro", OutputFormat::Png);
        assert!(restyle.contains("transparent background"));
    }

    #[test]
    fn synthesis_prompt_mentions_colors_only_when_given() {
        let with = synthesis_prompt("Acme", "Classic", Some("teal and gold"));
        assert!(with.contains("teal and gold"));
        let without = synthesis_prompt("Acme", "Classic", None);
        assert!(!without.contains("color palette"));
    }
}
