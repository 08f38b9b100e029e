//! `EisenScript` serializer
//!
//! Turns a [`Script`] into line-oriented text. All numbers print with three
//! decimals; negative zero prints as `0.000`; scale factors are floored at
//! [`MIN_SCALE`] so no zero or negative scale can be emitted whatever the inputs.

use super::grammar::{
    Call, ColorOp, Primitive, RuleDef, Script, Setting, Statement, Target, Transform,
    TransformLoop,
};
use std::fmt::{self, Write};

/// Smallest scale factor written to the output
pub const MIN_SCALE: f32 = 0.001;

const INDENT: &str = "  ";

/// Format a number with three decimals, without a negative zero.
pub(crate) fn number(value: f32) -> String {
    let text = format!("{value:.3}");
    if text == "-0.000" {
        "0.000".to_string()
    } else {
        text
    }
}

fn scale(value: f32) -> String {
    number(value.max(MIN_SCALE))
}

/// Strip anything that could end a comment early or break the line structure.
pub(crate) fn sanitize_comment(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .replace("*/", "* /")
        .trim()
        .to_string()
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Box => f.write_str("box"),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Transform::X(v) => write!(f, "x {}", number(v)),
            Transform::Y(v) => write!(f, "y {}", number(v)),
            Transform::Z(v) => write!(f, "z {}", number(v)),
            Transform::Rx(v) => write!(f, "rx {}", number(v)),
            Transform::Ry(v) => write!(f, "ry {}", number(v)),
            Transform::Rz(v) => write!(f, "rz {}", number(v)),
            Transform::Scale(x, y, z) => write!(f, "s {} {} {}", scale(x), scale(y), scale(z)),
        }
    }
}

impl fmt::Display for ColorOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ColorOp::Hue(v) => write!(f, "hue {}", number(v)),
            ColorOp::Sat(v) => write!(f, "sat {}", number(v)),
            ColorOp::Brightness(v) => write!(f, "b {}", number(v)),
        }
    }
}

/// Write `{ a b c }` for a list of displayable operators.
fn write_block<T: fmt::Display>(f: &mut fmt::Formatter<'_>, ops: &[T]) -> fmt::Result {
    f.write_str("{")?;
    for op in ops {
        write!(f, " {op}")?;
    }
    f.write_str(" }")
}

impl fmt::Display for TransformLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count != 1 {
            write!(f, "{} * ", self.count)?;
        }
        write_block(f, &self.transforms)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Rule(name) => f.write_str(name),
            Target::Primitive(primitive) => write!(f, "{primitive}"),
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for transform_loop in &self.loops {
            write!(f, "{transform_loop} ")?;
        }
        if !self.paint.is_empty() {
            write_block(f, &self.paint)?;
            f.write_str(" ")?;
        }
        write!(f, "{}", self.target)
    }
}

impl fmt::Display for RuleDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(comment) = &self.comment {
            writeln!(f, "// {}", sanitize_comment(comment))?;
        }
        write!(f, "rule {}", self.name)?;
        if let Some(max_depth) = self.max_depth {
            write!(f, " maxdepth {max_depth}")?;
        }
        if let Some(weight) = self.weight {
            write!(f, " w {}", number(weight))?;
        }
        f.write_str(" {\n")?;
        for call in &self.body {
            writeln!(f, "{INDENT}{call}")?;
        }
        f.write_str("}")
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Setting::MaxDepth(depth) => write!(f, "set maxdepth {depth}"),
            Setting::MaxObjects(count) => write!(f, "set maxobjects {count}"),
            Setting::Seed(seed) => write!(f, "set seed {seed}"),
            Setting::Background(color) => write!(f, "set background {color}"),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Banner(lines) => {
                f.write_str("/*\n")?;
                for line in lines {
                    let line = sanitize_comment(line);
                    if line.is_empty() {
                        f.write_str("\n")?;
                    } else {
                        writeln!(f, "{INDENT}{line}")?;
                    }
                }
                f.write_str("*/")
            }
            Statement::Comment(text) => write!(f, "// {}", sanitize_comment(text)),
            Statement::Blank => Ok(()),
            Statement::Setting(setting) => write!(f, "{setting}"),
            Statement::Rule(rule) => write!(f, "{rule}"),
            Statement::Call(call) => write!(f, "{call}"),
        }
    }
}

/// Serialize a script, one statement per line (rules span several).
pub fn render(script: &Script) -> String {
    let mut out = String::new();
    for statement in &script.statements {
        // Writing into a String cannot fail
        let _ = writeln!(out, "{statement}");
    }
    out
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_formatting() {
        assert_eq!(number(1.0), "1.000");
        assert_eq!(number(-0.0001), "0.000");
        assert_eq!(number(-12.3456), "-12.346");
    }

    #[test]
    fn test_scale_never_zero_or_negative() {
        let text = Transform::Scale(0.0, -1.0, 0.00001).to_string();
        assert_eq!(text, "s 0.001 0.001 0.001");
    }

    #[test]
    fn test_call_serialization() {
        let call = Call::rule("clump")
            .with_loop(TransformLoop::repeat(12, vec![Transform::Ry(30.0)]))
            .with_transforms(vec![Transform::X(2.0)])
            .with_paint(vec![ColorOp::Hue(90.0), ColorOp::Sat(0.85)]);
        assert_eq!(
            call.to_string(),
            "12 * { ry 30.000 } { x 2.000 } { hue 90.000 sat 0.850 } clump"
        );
        assert_eq!(Call::primitive(Primitive::Box).to_string(), "box");
    }

    #[test]
    fn test_rule_serialization() {
        let rule = RuleDef::new(
            "spike",
            vec![Call::primitive(Primitive::Box).with_transforms(vec![Transform::Scale(
                0.2, 0.2, 1.5,
            )])],
        )
        .with_max_depth(8)
        .with_weight(2.0)
        .with_comment("Pointy spikes");
        assert_eq!(
            rule.to_string(),
            "// Pointy spikes\nrule spike maxdepth 8 w 2.000 {\n  { s 0.200 0.200 1.500 } box\n}"
        );
    }

    #[test]
    fn test_comment_sanitization() {
        assert_eq!(sanitize_comment("tag */ rule x {\n}"), "tag * / rule x { }");
        let banner = Statement::Banner(vec!["end */ here".to_string(), String::new()]);
        assert_eq!(banner.to_string(), "/*\n  end * / here\n\n*/");
    }

    #[test]
    fn test_render_settings() {
        let mut script = Script::default();
        script.push(Statement::Setting(Setting::MaxDepth(60)));
        script.push(Statement::Setting(Setting::Background("#000000".to_string())));
        script.push(Statement::Blank);
        script.push(Statement::Call(Call::rule("scene")));
        assert_eq!(
            render(&script),
            "set maxdepth 60\nset background #000000\n\nscene\n"
        );
    }
}
