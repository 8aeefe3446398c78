use crate::config::{Config, Prop, PropKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassKind {
    Utility,
    State,
    Escape,
}

impl ClassKind {
    fn detect(class_name: &str) -> Option<Self> {
        if class_name.starts_with("oo-") {
            Some(ClassKind::Utility)
        } else if class_name.starts_with("oe-") {
            Some(ClassKind::State)
        } else if class_name.starts_with("ee-") {
            Some(ClassKind::Escape)
        } else {
            None
        }
    }
}

pub fn compile(class_name: &str, config: &Config) -> String {
    for screen in &config.screens {
        let marker = format!("{}__", screen.name);
        if !class_name.contains(&marker) {
            continue;
        }
        let inner = match class_name.rsplit_once("__") {
            Some((_, rest)) => rest,
            None => class_name,
        };
        let compiled = compile_class(inner, &config.props);
        if compiled.is_empty() {
            return String::new();
        }
        return format!(
            "@media only screen and (max-width: {}) {{.{}{}}}",
            screen.size,
            marker,
            compiled.trim_start_matches('.')
        );
    }
    compile_class(class_name, &config.props)
}

fn compile_class(class_name: &str, props: &[Prop]) -> String {
    match ClassKind::detect(class_name) {
        Some(ClassKind::Utility) => utility_styles(class_name, props),
        Some(ClassKind::State) => state_styles(class_name),
        Some(ClassKind::Escape) => escape_styles(class_name),
        None => String::new(),
    }
}

fn utility_styles(class_name: &str, props: &[Prop]) -> String {
    let Some(prop) = prop_by_class_name(class_name, props) else {
        return String::new();
    };
    match prop.kind {
        PropKind::Range => range_styles(class_name, prop),
        PropKind::Color => color_styles(class_name, prop),
    }
}

fn range_styles(class_name: &str, prop: &Prop) -> String {
    let (base, multiplier) = match class_name.split_once('_') {
        Some((base, multiplier)) => (base, Some(multiplier)),
        None => (class_name, None),
    };
    let Some(direction) = direction_for(base, prop) else {
        return String::new();
    };
    let factor = multiplier
        .map(|value| format!(" * {}", value))
        .unwrap_or_default();
    format!(
        ".{} {{{}{}:calc(var(--oo-{}){});}}",
        class_name, prop.property, direction, prop.name, factor
    )
}

fn color_styles(class_name: &str, prop: &Prop) -> String {
    format!(
        ".{} {{{}: var(--oo-{}); }}",
        class_name, prop.property, prop.name
    )
}

fn escape_styles(class_name: &str) -> String {
    let Some((path, value)) = class_name.split_once('_') else {
        return String::new();
    };
    let property = path.strip_prefix("ee-").unwrap_or(path);
    let value = if value.parse::<i64>().is_ok() {
        format!("{}rem", value)
    } else {
        value.to_string()
    };
    format!(".{}{{{}:{}}}", class_name, property, value)
}

fn state_styles(class_name: &str) -> String {
    let stripped = remove_prefix(class_name);
    let (state, variant) = match stripped.split_once('-') {
        Some((state, variant)) => (state, variant),
        None => (stripped, ""),
    };
    let variant = if variant.is_empty() { "primary" } else { variant };
    remove_spaces(&format!(
        ".oe-{state}-{variant}:{state} {{
            color: var(--oo-background-color-{variant});
            background-color: var(--oo-text-color-{variant})
        }}"
    ))
}

fn prop_by_class_name<'a>(class_name: &str, props: &'a [Prop]) -> Option<&'a Prop> {
    let stripped = remove_prefix(class_name);
    props.iter().find(|prop| stripped.contains(&prop.name))
}

fn direction_for<'a>(base: &str, prop: &'a Prop) -> Option<&'a str> {
    let stripped = remove_prefix(base);
    if stripped == prop.name {
        return Some("");
    }
    let directions = prop.direction.as_deref().unwrap_or(&[]);
    let mut matching = directions
        .iter()
        .filter(|dir| format!("{}{}", prop.name, dir) == stripped);
    let first = matching.next()?;
    if matching.next().is_some() {
        return None;
    }
    Some(first)
}

fn remove_prefix(class_name: &str) -> &str {
    for marker in ["oo-", "oe-", "ee-"] {
        if let Some(rest) = class_name.strip_prefix(marker) {
            return rest;
        }
    }
    class_name
}

fn remove_spaces(input: &str) -> String {
    input.chars().filter(|ch| !ch.is_whitespace()).collect()
}

pub fn root_styles(config: &Config) -> String {
    let mut css = String::from(":root{");
    for screen in &config.screens {
        for prop in &config.props {
            let unit = match prop.kind {
                PropKind::Range => "rem",
                PropKind::Color => "",
            };
            css.push_str(&format!(
                "--{}-{}:({}{});",
                screen.name, prop.name, prop.value, unit
            ));
        }
    }
    css.push('}');
    css
}

pub fn assemble(class_names: &[String], config: &Config) -> String {
    class_names
        .iter()
        .fold(root_styles(config), |mut css, class_name| {
            css.push_str(&compile(class_name, config));
            css
        })
}
