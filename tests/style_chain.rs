use pumice::cache::{cache_directory, CachePurpose};
use pumice::loader::{CssModules, Preprocessor, Step, StyleChainBuilder};
use pumice::BuildMode;

mod common;
use common::{dev, env, prod};

fn tool_ids(chain: &[Step]) -> Vec<&'static str> {
    chain.iter().map(Step::tool_id).collect()
}

fn css_options(chain: &[Step]) -> &pumice::loader::CssOptions {
    chain
        .iter()
        .find_map(|s| match s {
            Step::Css(options) => Some(options),
            _ => None,
        })
        .unwrap()
}

#[test]
fn production_plain_css() {
    let env = prod();
    let chain = StyleChainBuilder::new(&env).build(CssModules::Global, None);
    assert_eq!(
        vec!["mini-css-extract-plugin/loader", "css-loader", "postcss-loader"],
        tool_ids(&chain)
    );
    let css = css_options(&chain);
    assert_eq!(1, css.import_loaders);
    assert!(!css.modules);
    assert!(css.local_ident_name.is_none());
}

#[test]
fn development_sass_modules() {
    let env = dev();
    let chain = StyleChainBuilder::new(&env)
        .build(CssModules::local(&env), Some(Preprocessor::Sass));
    assert_eq!(
        vec![
            "cache-loader",
            "style-loader",
            "css-loader",
            "postcss-loader",
            "sass-loader"
        ],
        tool_ids(&chain)
    );

    let css = css_options(&chain);
    assert_eq!(2, css.import_loaders);
    assert!(css.modules);
    assert_eq!(Some("[path][name]__[local]"), css.local_ident_name.as_deref());

    match &chain[0] {
        Step::Cache(options) => assert_eq!(
            cache_directory("/project", BuildMode::Development, CachePurpose::PreTransform),
            options.cache_directory
        ),
        other => panic!("expected cache step, got {:?}", other),
    }
}

#[test]
fn import_loaders_count_following_steps() {
    for env in &[dev(), prod()] {
        let builder = StyleChainBuilder::new(env);
        for preprocessor in &[None, Some(Preprocessor::Sass)] {
            let chain = builder.build(CssModules::Global, *preprocessor);
            let position = chain
                .iter()
                .position(|s| matches!(s, Step::Css(_)))
                .unwrap();
            assert_eq!(
                chain.len() - position - 1,
                css_options(&chain).import_loaders
            );
        }
    }
}

#[test]
fn production_local_ident_is_hashed() {
    let env = prod();
    let chain =
        StyleChainBuilder::new(&env).build(CssModules::local(&env), None);
    assert_eq!(
        Some("[hash:base64:5]"),
        css_options(&chain).local_ident_name.as_deref()
    );
}

#[test]
fn chain_lengths() {
    for mode in &[BuildMode::Development, BuildMode::Production] {
        let env = env(*mode, true);
        let builder = StyleChainBuilder::new(&env);
        for preprocessor in &[None, Some(Preprocessor::Sass)] {
            for modules in &[CssModules::Global, CssModules::local(&env)] {
                let chain = builder.build(modules.clone(), *preprocessor);
                let expected = 2
                    + if env.is_dev() { 2 } else { 1 }
                    + if preprocessor.is_some() { 1 } else { 0 };
                assert_eq!(expected, chain.len());
                assert_eq!(env.is_dev(), chain.contains(&Step::StyleInject));
                assert_eq!(env.is_prod(), chain.contains(&Step::StyleExtract));
            }
        }
    }
}

#[test]
fn chains_are_deterministic() {
    let env = dev();
    let builder = StyleChainBuilder::new(&env);
    let first = builder.build(CssModules::local(&env), Some(Preprocessor::Sass));
    let second = StyleChainBuilder::new(&dev())
        .build(CssModules::local(&env), Some(Preprocessor::Sass));
    assert_eq!(first, second);
}

#[test]
fn source_maps_follow_production_toggle() {
    let source_maps = |chain: &[Step]| -> Vec<bool> {
        chain
            .iter()
            .filter_map(|s| match s {
                Step::Css(o) => Some(o.source_map),
                Step::PostCss(o) => Some(o.source_map),
                Step::Preprocess(o) => Some(o.source_map),
                _ => None,
            })
            .collect()
    };

    let on = prod();
    let chain = StyleChainBuilder::new(&on)
        .build(CssModules::Global, Some(Preprocessor::Sass));
    assert_eq!(vec![true, true, true], source_maps(&chain));

    let off = env(BuildMode::Production, false);
    let chain = StyleChainBuilder::new(&off)
        .build(CssModules::Global, Some(Preprocessor::Sass));
    assert_eq!(vec![false, false, false], source_maps(&chain));

    let dev = env(BuildMode::Development, true);
    let chain = StyleChainBuilder::new(&dev)
        .build(CssModules::Global, Some(Preprocessor::Sass));
    assert_eq!(vec![false, false, false], source_maps(&chain));
}

#[test]
fn postcss_plugins_are_fixed() -> anyhow::Result<()> {
    let env = prod();
    let chain = StyleChainBuilder::new(&env).build(CssModules::Global, None);
    let json = serde_json::to_value(&chain[2])?;
    assert_eq!("postcss-loader", json["loader"]);
    assert_eq!("postcss", json["options"]["ident"]);
    assert_eq!(
        "postcss-flexbugs-fixes",
        json["options"]["plugins"][0]["name"]
    );
    assert_eq!("no-2009", json["options"]["plugins"][1]["autoprefixerFlexbox"]);
    assert_eq!(3, json["options"]["plugins"][1]["stage"]);
    Ok(())
}
