use crate::document::{LiteralValue, ModeValue, Rgba, VariableType};

/// Renders a literal as CSS value text for a variable of type `resolved_type`.
///
/// Returns `None` when the value does not fit the declared type; callers omit
/// the declaration in that case.
pub fn render_literal(value: &LiteralValue, resolved_type: VariableType) -> Option<String> {
    match (resolved_type, value) {
        (VariableType::String, LiteralValue::String(text)) => Some(format!("\"{text}\"")),
        (VariableType::Float, LiteralValue::Float(number)) => Some(number.to_string()),
        (VariableType::Boolean, LiteralValue::Boolean(flag)) => Some(flag.to_string()),
        (VariableType::Color, LiteralValue::Color(color)) => Some(render_color(color)),
        _ => None,
    }
}

/// Renders one mode value. Aliases become `var(<full name>)`; an alias that
/// never had its name resolved renders nothing.
pub fn render_mode_value(value: &ModeValue, resolved_type: VariableType) -> Option<String> {
    match value {
        ModeValue::Alias(alias) => alias.name.as_ref().map(|name| format!("var({name})")),
        ModeValue::Literal(literal) => render_literal(literal, resolved_type),
    }
}

pub fn render_color(color: &Rgba) -> String {
    if color.a == 1.0 {
        format!(
            "#{}{}{}",
            channel_hex(color.r),
            channel_hex(color.g),
            channel_hex(color.b)
        )
    } else {
        format!("rgba({}, {}, {}, {})", color.r, color.g, color.b, color.a)
    }
}

fn channel_hex(channel: f64) -> String {
    let byte = (channel * 255.0).round().clamp(0.0, 255.0) as u8;
    format!("{byte:02x}")
}

#[cfg(test)]
mod tests {
    use crate::document::{LiteralValue, ModeValue, Rgba, VariableAlias, VariableType};

    use super::{render_color, render_literal, render_mode_value};

    #[test]
    fn opaque_colors_render_as_zero_padded_lowercase_hex() {
        assert_eq!(render_color(&Rgba::new(1.0, 0.5, 0.0, 1.0)), "#ff8000");
        assert_eq!(render_color(&Rgba::new(0.02, 0.0, 1.0, 1.0)), "#0500ff");
        assert_eq!(render_color(&Rgba::new(0.0, 0.0, 0.0, 1.0)), "#000000");
    }

    #[test]
    fn translucent_colors_pass_channels_through_unconverted() {
        assert_eq!(
            render_color(&Rgba::new(0.2, 0.4, 0.6, 0.5)),
            "rgba(0.2, 0.4, 0.6, 0.5)"
        );
        assert_eq!(
            render_color(&Rgba::new(1.0, 0.0, 0.0, 0.0)),
            "rgba(1, 0, 0, 0)"
        );
    }

    #[test]
    fn scalar_literals_render_without_extra_formatting() {
        assert_eq!(
            render_literal(&LiteralValue::String("Inter".to_owned()), VariableType::String),
            Some("\"Inter\"".to_owned())
        );
        assert_eq!(
            render_literal(&LiteralValue::Float(16.0), VariableType::Float),
            Some("16".to_owned())
        );
        assert_eq!(
            render_literal(&LiteralValue::Float(1.25), VariableType::Float),
            Some("1.25".to_owned())
        );
        assert_eq!(
            render_literal(&LiteralValue::Boolean(false), VariableType::Boolean),
            Some("false".to_owned())
        );
    }

    #[test]
    fn values_not_matching_declared_type_render_nothing() {
        assert_eq!(
            render_literal(&LiteralValue::Float(2.0), VariableType::Color),
            None
        );
        assert_eq!(
            render_literal(&LiteralValue::Boolean(true), VariableType::String),
            None
        );
    }

    #[test]
    fn aliases_render_as_var_references() {
        let named = ModeValue::Alias(VariableAlias::new("VariableID:3").with_name("--core-b"));
        assert_eq!(
            render_mode_value(&named, VariableType::Float),
            Some("var(--core-b)".to_owned())
        );

        let unnamed = ModeValue::Alias(VariableAlias::new("VariableID:3"));
        assert_eq!(render_mode_value(&unnamed, VariableType::Float), None);
    }
}
