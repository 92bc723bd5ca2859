//! Transform engine for script and style assets.
//!
//! Uses oxc for JavaScript/TypeScript and lightningcss for CSS. The engine is
//! a black box to the request pipeline: source text plus a resolved option
//! set in, output text or an error out.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::semantic::SemanticBuilder;
use oxc::span::SourceType;
use oxc::transformer::{TransformOptions, Transformer};
use thiserror::Error;

use super::{Loader, OutputFormat, ResolvedTransform};

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("invalid transform target: {0}")]
    InvalidTarget(String),
    #[error("failed to parse {file}: {message}")]
    Parse { file: String, message: String },
    #[error("failed to transform {file}: {message}")]
    Transform { file: String, message: String },
    #[error("failed to process stylesheet {file}: {message}")]
    Css { file: String, message: String },
}

/// Transform one asset's source text with the resolved options.
pub fn transform(source: &str, options: &ResolvedTransform) -> Result<String, TransformError> {
    match options.loader {
        Loader::Css => transform_css(source, options),
        _ => transform_js(source, options),
    }
}

fn transform_js(source: &str, options: &ResolvedTransform) -> Result<String, TransformError> {
    let allocator = Allocator::default();
    let source_type = source_type_for(options.loader, options.format);

    let parsed = Parser::new(&allocator, source, source_type).parse();
    if !parsed.errors.is_empty() {
        return Err(TransformError::Parse {
            file: options.sourcefile.clone(),
            message: join_diagnostics(&parsed.errors),
        });
    }
    let mut program = parsed.program;

    // Lower syntax to the resolved target and strip types.
    let transform_options = TransformOptions::from_target(&options.target)
        .map_err(|err| TransformError::InvalidTarget(err.to_string()))?;
    let scoping = SemanticBuilder::new()
        .build(&program)
        .semantic
        .into_scoping();
    let transformed = Transformer::new(&allocator, Path::new(&options.sourcefile), &transform_options)
        .build_with_scoping(scoping, &mut program);
    if !transformed.errors.is_empty() {
        return Err(TransformError::Transform {
            file: options.sourcefile.clone(),
            message: join_diagnostics(&transformed.errors),
        });
    }

    let scoping = if options.minify {
        let minified = Minifier::new(MinifierOptions {
            mangle: Some(MangleOptions::default()),
            compress: Some(CompressOptions::smallest()),
        })
        .minify(&allocator, &mut program);
        minified.scoping
    } else {
        None
    };

    let output = Codegen::new()
        .with_options(CodegenOptions {
            minify: options.minify,
            comments: if options.minify {
                CommentOptions::disabled()
            } else {
                CommentOptions::default()
            },
            source_map_path: options
                .sourcemap
                .then(|| PathBuf::from(&options.sourcefile)),
            ..CodegenOptions::default()
        })
        .with_scoping(scoping)
        .build(&program);

    let mut code = output.code;
    if options.sourcemap {
        if let Some(map) = output.map {
            code.push_str("\n//# sourceMappingURL=data:application/json;charset=utf-8;base64,");
            code.push_str(&BASE64.encode(map.to_json_string()));
            code.push('\n');
        }
    }
    Ok(code)
}

// CSS keeps its own path: lightningcss reprints (and optionally minifies) the
// stylesheet. CSS source maps and browser-target lowering are not produced.
fn transform_css(source: &str, options: &ResolvedTransform) -> Result<String, TransformError> {
    let stylesheet = StyleSheet::parse(
        source,
        ParserOptions {
            filename: options.sourcefile.clone(),
            ..ParserOptions::default()
        },
    )
    .map_err(|err| TransformError::Css {
        file: options.sourcefile.clone(),
        message: err.to_string(),
    })?;

    let result = stylesheet
        .to_css(PrinterOptions {
            minify: options.minify,
            ..PrinterOptions::default()
        })
        .map_err(|err| TransformError::Css {
            file: options.sourcefile.clone(),
            message: err.to_string(),
        })?;
    Ok(result.code)
}

fn source_type_for(loader: Loader, format: OutputFormat) -> SourceType {
    let base = match format {
        OutputFormat::Esm => SourceType::mjs(),
        OutputFormat::Cjs | OutputFormat::Iife => SourceType::cjs(),
    };
    match loader {
        Loader::Js | Loader::Css => base,
        Loader::Jsx => base.with_jsx(true),
        Loader::Ts => base.with_typescript(true),
        Loader::Tsx => base.with_typescript(true).with_jsx(true),
    }
}

fn join_diagnostics<T: ToString>(errors: &[T]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(loader: Loader) -> ResolvedTransform {
        ResolvedTransform {
            target: "es2015".to_string(),
            format: OutputFormat::Esm,
            sourcemap: false,
            minify: false,
            loader,
            sourcefile: "/app.ts".to_string(),
        }
    }

    #[test]
    fn test_strips_typescript_types() {
        let code = transform("export const answer: number = 42;", &resolved(Loader::Ts)).unwrap();
        assert!(code.contains("answer"));
        assert!(code.contains("42"));
        assert!(!code.contains("number"));
    }

    #[test]
    fn test_minify_compresses_output() {
        let mut options = resolved(Loader::Js);
        options.minify = true;
        let source = "export const answer = 40 + 2; // a comment\n";
        let code = transform(source, &options).unwrap();
        assert!(!code.contains("comment"));
        assert!(code.len() < source.len());
    }

    #[test]
    fn test_inline_sourcemap_appended() {
        let mut options = resolved(Loader::Ts);
        options.sourcemap = true;
        let code = transform("export const answer: number = 42;", &options).unwrap();
        assert!(code.contains("//# sourceMappingURL=data:application/json"));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = transform("const = ;", &resolved(Loader::Ts)).unwrap_err();
        assert!(matches!(err, TransformError::Parse { .. }));
        assert!(err.to_string().contains("/app.ts"));
    }

    #[test]
    fn test_invalid_target_is_reported() {
        let mut options = resolved(Loader::Ts);
        options.target = "banana".to_string();
        let err = transform("export const x = 1;", &options).unwrap_err();
        assert!(matches!(err, TransformError::InvalidTarget(_)));
    }

    #[test]
    fn test_css_minify() {
        let mut options = resolved(Loader::Css);
        options.sourcefile = "/style.css".to_string();
        options.minify = true;
        let code = transform(".a { color: #ffffff; }", &options).unwrap();
        assert_eq!(code, ".a{color:#fff}");
    }

    #[test]
    fn test_css_reprint_without_minify() {
        let mut options = resolved(Loader::Css);
        options.sourcefile = "/style.css".to_string();
        let code = transform(".a { color: red; }", &options).unwrap();
        assert!(code.contains("color"));
        assert!(!code.is_empty());
    }

    #[test]
    fn test_css_parse_error_is_reported() {
        let mut options = resolved(Loader::Css);
        options.sourcefile = "/style.css".to_string();
        let err = transform(".a { color: }", &options).unwrap_err();
        assert!(matches!(err, TransformError::Css { .. }));
    }
}
