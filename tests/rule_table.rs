use std::path::PathBuf;

use anyhow::Result;

use pumice::loader::{Step, SyntaxPreset};
use pumice::rules::{RuleKind, RuleTable, RuleTableBuilder};
use pumice::Environment;

mod common;
use common::{dev, prod};

const EXTENSIONS: &[&str] = &[
    "bmp", "gif", "jpg", "jpeg", "png", "js", "mjs", "jsx", "ts", "tsx",
    "css", "scss", "sass", "html", "json", "svg", "woff2", "xyz", "txt",
];

const STEMS: &[&str] = &["index", "App.module", "module"];

const DIRECTORIES: &[&str] = &[
    "/project/src/components",
    "/project/node_modules/lib",
    "/project/node_modules/@babel/runtime/helpers",
    "/elsewhere",
];

fn table(env: &Environment) -> Result<RuleTable> {
    Ok(RuleTableBuilder::new(env).build()?)
}

fn universe() -> Vec<PathBuf> {
    let mut files = Vec::new();
    for dir in DIRECTORIES {
        for stem in STEMS {
            for ext in EXTENSIONS {
                files.push(PathBuf::from(dir).join(format!("{}.{}", stem, ext)));
            }
        }
    }
    files
}

fn kind_of(table: &RuleTable, file: &str) -> Option<RuleKind> {
    table.resolve(file).map(|r| r.kind)
}

#[test]
fn declaration_order() -> Result<()> {
    let table = table(&dev())?;
    let kinds: Vec<RuleKind> = table.rules().iter().map(|r| r.kind).collect();
    assert_eq!(
        vec![
            RuleKind::MediaInline,
            RuleKind::ApplicationScript,
            RuleKind::DependencyScript,
            RuleKind::Style,
            RuleKind::StyleModule,
            RuleKind::PreprocessedStyle,
            RuleKind::PreprocessedStyleModule,
            RuleKind::CatchAll,
        ],
        kinds
    );
    assert!(table.rules().last().unwrap().is_catch_all());
    assert!(table.strict_export_presence);
    assert!(!table.require_ensure);
    Ok(())
}

#[test]
fn membership() -> Result<()> {
    let table = table(&dev())?;

    let icon: Vec<RuleKind> = table
        .matching("/project/src/icon.png")
        .filter(|r| !r.is_catch_all())
        .map(|r| r.kind)
        .collect();
    assert_eq!(vec![RuleKind::MediaInline], icon);
    assert_eq!(Some(RuleKind::MediaInline), kind_of(&table, "/project/src/icon.png"));

    let sass: Vec<RuleKind> = table
        .matching("/project/src/App.module.scss")
        .filter(|r| !r.is_catch_all())
        .map(|r| r.kind)
        .collect();
    assert_eq!(vec![RuleKind::PreprocessedStyleModule], sass);

    for dir in DIRECTORIES {
        let file = PathBuf::from(dir).join("weird.xyz");
        let kinds: Vec<RuleKind> = table.matching(&file).map(|r| r.kind).collect();
        assert_eq!(vec![RuleKind::CatchAll], kinds);
    }
    Ok(())
}

#[test]
fn dispatch() -> Result<()> {
    let table = table(&prod())?;
    let cases = &[
        ("/project/src/photo.jpeg", Some(RuleKind::MediaInline)),
        ("/project/src/App.tsx", Some(RuleKind::ApplicationScript)),
        ("/project/src/index.js", Some(RuleKind::ApplicationScript)),
        ("/project/node_modules/lib/index.mjs", Some(RuleKind::DependencyScript)),
        ("/project/src/index.css", Some(RuleKind::Style)),
        ("/project/src/App.module.css", Some(RuleKind::StyleModule)),
        ("/project/src/theme.sass", Some(RuleKind::PreprocessedStyle)),
        ("/project/src/App.module.sass", Some(RuleKind::PreprocessedStyleModule)),
        ("/project/src/font.woff2", Some(RuleKind::CatchAll)),
        ("/project/src/logo.svg", Some(RuleKind::CatchAll)),
        ("/project/src/index.html", None),
        ("/project/src/data.json", None),
        ("/project/node_modules/lib/types.ts", None),
        ("/project/node_modules/@babel/runtime/helpers/extends.js", None),
    ];
    for (file, expected) in cases {
        assert_eq!(*expected, kind_of(&table, file), "dispatch {}", file);
    }
    Ok(())
}

#[test]
fn rules_never_overlap() -> Result<()> {
    for env in &[dev(), prod()] {
        let table = table(env)?;
        for file in universe() {
            let claimed = table
                .matching(&file)
                .filter(|r| !r.is_catch_all())
                .count();
            assert!(claimed <= 1, "{} claimed by {} rules", file.display(), claimed);
        }
    }
    Ok(())
}

#[test]
fn fall_through_is_limited_to_engine_types() -> Result<()> {
    let table = table(&dev())?;
    for file in universe() {
        if table.resolve(&file).is_none() {
            let ext = file.extension().unwrap().to_str().unwrap();
            assert!(
                ["js", "mjs", "jsx", "ts", "tsx", "html", "json"].contains(&ext),
                "{} fell through the table",
                file.display()
            );
        }
    }
    Ok(())
}

#[test]
fn global_styles_have_side_effects() -> Result<()> {
    let table = table(&prod())?;
    for rule in table.rules() {
        let expected = matches!(
            rule.kind,
            RuleKind::Style | RuleKind::PreprocessedStyle
        );
        assert_eq!(expected, rule.side_effects, "{}", rule.kind);
    }
    Ok(())
}

#[test]
fn style_rules_use_mode_specific_chain() -> Result<()> {
    for env in &[dev(), prod()] {
        let table = table(env)?;
        for kind in &[
            RuleKind::Style,
            RuleKind::StyleModule,
            RuleKind::PreprocessedStyle,
            RuleKind::PreprocessedStyleModule,
        ] {
            let rule = table.get(*kind).unwrap();
            let ids = rule.tool_ids();
            assert_eq!(env.is_dev(), ids.contains(&"style-loader"));
            assert_eq!(env.is_prod(), ids.contains(&"mini-css-extract-plugin/loader"));
        }
    }
    Ok(())
}

#[test]
fn script_chains() -> Result<()> {
    for env in &[dev(), prod()] {
        let table = table(env)?;

        let app = table.get(RuleKind::ApplicationScript).unwrap();
        assert_eq!(vec!["cache-loader", "babel-loader"], app.tool_ids());
        match &app.chain[1] {
            Step::Transpile(options) => {
                assert_eq!(SyntaxPreset::Application, options.preset);
                assert_eq!(env.is_prod(), options.compact);
                assert!(options
                    .cache_directory
                    .ends_with(if env.is_prod() { "prod" } else { "dev" }));
            }
            other => panic!("expected transpile step, got {:?}", other),
        }

        let deps = table.get(RuleKind::DependencyScript).unwrap();
        assert_eq!(vec!["cache-loader", "babel-loader"], deps.tool_ids());
        match &deps.chain[1] {
            Step::Transpile(options) => {
                assert_eq!(SyntaxPreset::Standard, options.preset);
                assert_eq!(Some(false), options.source_maps);
                assert_eq!(Some(env.is_prod()), options.cache_compression);
                assert_eq!(env.is_prod(), options.compact);
            }
            other => panic!("expected transpile step, got {:?}", other),
        }
    }
    Ok(())
}

#[test]
fn serialized_shape() -> Result<()> {
    let table = table(&prod())?;
    let json = serde_json::to_value(&table)?;
    let rules = json["oneOf"].as_array().unwrap();
    assert_eq!(8, rules.len());
    assert_eq!("url-loader", rules[0]["use"][0]["loader"]);
    assert_eq!(10000, rules[0]["use"][0]["options"]["limit"]);
    assert_eq!(
        "static/media/[name].[hash:8].[ext]",
        rules[0]["use"][0]["options"]["name"]
    );
    assert_eq!(true, rules[3]["sideEffects"]);
    assert!(rules[7].get("test").is_none());
    assert_eq!(3, rules[7]["exclude"].as_array().unwrap().len());
    Ok(())
}

#[test]
fn dotted_paths_are_normalized() -> Result<()> {
    let table = table(&dev())?;
    let cases = &[
        ("/project/src/../node_modules/lib/x.js", Some(RuleKind::DependencyScript)),
        ("/project/node_modules/../src/./x.js", Some(RuleKind::ApplicationScript)),
        ("/project/src/components/../../node_modules/lib/x.ts", None),
    ];
    for (file, expected) in cases {
        assert_eq!(*expected, kind_of(&table, file), "dispatch {}", file);
        let kinds: Vec<RuleKind> = table
            .matching(*file)
            .filter(|r| !r.is_catch_all())
            .map(|r| r.kind)
            .collect();
        assert_eq!(expected.iter().copied().collect::<Vec<_>>(), kinds);
    }
    Ok(())
}

#[test]
fn serialized_loader_is_tool_id() -> Result<()> {
    for env in &[dev(), prod()] {
        let table = table(env)?;
        for rule in table.rules() {
            for step in &rule.chain {
                let json = serde_json::to_value(step)?;
                assert_eq!(step.tool_id(), json["loader"], "{}", rule.kind);
                let unit = matches!(step, Step::StyleInject | Step::StyleExtract);
                assert_eq!(unit, json.get("options").is_none(), "{}", step.tool_id());
            }
        }
    }
    Ok(())
}
