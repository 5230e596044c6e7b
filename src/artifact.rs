//! Renders the `data-loader.js` artifact.
//!
//! Output contract: the file declares `const <global> = { ... };` with the
//! keys `claude`, `gemini`, `manus`, `openai`, `perplexity` (each an object
//! with `summary` and `fullResearch`) and `initialPrompt`, then assigns it to
//! `window.<global>` so a plain `<script>` include exposes it to the page.

use crate::compiler::ResearchBundle;
use crate::provider::Provider;
use crate::sanitize::escape_template_literal;

const HEADER: &str = "// Research data content (compiled from source files)\n";
const INDENT: &str = "    ";

fn push_literal(out: &mut String, text: &str) {
    out.push('`');
    out.push_str(&escape_template_literal(text));
    out.push('`');
}

pub fn render(bundle: &ResearchBundle, global_name: &str) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push_str(&format!("const {global_name} = {{\n"));

    for provider in Provider::ALL {
        let (summary, full) = match bundle.providers.get(&provider) {
            Some(r) => (r.summary.as_str(), r.full_research.as_str()),
            None => ("", ""),
        };

        out.push_str(&format!("{INDENT}{}: {{\n", provider.key()));
        out.push_str(&format!("{INDENT}{INDENT}summary: "));
        push_literal(&mut out, summary);
        out.push_str(",\n");
        out.push_str(&format!("{INDENT}{INDENT}fullResearch: "));
        push_literal(&mut out, full);
        out.push('\n');
        out.push_str(&format!("{INDENT}}},\n"));
    }

    out.push_str(&format!("{INDENT}initialPrompt: "));
    push_literal(&mut out, &bundle.initial_prompt);
    out.push_str("\n};\n\n");

    out.push_str("// Export data for use in main script\n");
    out.push_str(&format!("window.{global_name} = {global_name};\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderResult;

    /// Evaluates the template literals of a rendered artifact, in order.
    fn literals(js: &str) -> Vec<String> {
        let mut found = Vec::new();
        let mut chars = js.chars();
        while let Some(c) = chars.next() {
            if c != '`' {
                continue;
            }
            let mut lit = String::new();
            loop {
                match chars.next() {
                    Some('\\') => lit.push(chars.next().unwrap()),
                    Some('`') => break,
                    Some('$') => {
                        // An unescaped `${` would start an interpolation.
                        let next = chars.clone().next();
                        assert_ne!(next, Some('{'), "live interpolation in {lit:?}");
                        lit.push('$');
                    }
                    Some(other) => lit.push(other),
                    None => panic!("unterminated literal"),
                }
            }
            found.push(lit);
        }
        found
    }

    fn bundle_with(provider: Provider, summary: &str, full: &str) -> ResearchBundle {
        let mut bundle = ResearchBundle::default();
        bundle.providers.insert(
            provider,
            ProviderResult {
                summary: summary.into(),
                full_research: full.into(),
            },
        );
        bundle
    }

    #[test]
    fn empty_bundle_has_all_six_fields() {
        let js = render(&ResearchBundle::default(), "researchData");
        for key in ["claude", "gemini", "manus", "openai", "perplexity"] {
            assert!(js.contains(&format!("    {key}: {{\n")), "missing {key}");
        }
        assert!(js.contains("    initialPrompt: ``\n"));
        assert!(js.starts_with("// Research data content"));
        assert!(js.ends_with("window.researchData = researchData;\n"));
        assert_eq!(literals(&js), vec![String::new(); 11]);
    }

    #[test]
    fn special_characters_round_trip() {
        let nasty = "Use `code` and ${var}; cost $5; path C:\\tmp\\`x`";
        let js = render(&bundle_with(Provider::Gemini, nasty, nasty), "researchData");
        assert!(js.contains("\\`code\\`"));
        assert!(js.contains("\\${var}"));

        let lits = literals(&js);
        // claude (2), then gemini summary and fullResearch.
        assert_eq!(lits[2], nasty);
        assert_eq!(lits[3], nasty);
    }

    #[test]
    fn custom_global_name() {
        let js = render(&ResearchBundle::default(), "aiDetection");
        assert!(js.contains("const aiDetection = {\n"));
        assert!(js.ends_with("window.aiDetection = aiDetection;\n"));
    }
}
