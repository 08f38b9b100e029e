//! Abstract syntax tree for the generated `EisenScript`
//!
//! A script is a flat list of statements: comments, `set` lines, rule definitions
//! and top-level calls. A call is a chain of transform loops, an optional color
//! block, and a target (another rule or a terminal primitive). Keeping colors in
//! their own block means a hue change never rewrites a geometry transform.
//!
//! Serialization lives in [`super::serialize`].

/// Terminal shapes understood by Structure Synth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Unit cube
    Box,
}

/// Geometric transform operator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Translate along x
    X(f32),
    /// Translate along y (up)
    Y(f32),
    /// Translate along z
    Z(f32),
    /// Rotate about x, degrees
    Rx(f32),
    /// Rotate about y, degrees
    Ry(f32),
    /// Rotate about z, degrees
    Rz(f32),
    /// Non-uniform scale; serialized factors are floored to stay positive
    Scale(f32, f32, f32),
}

/// Color operator (never changes geometry)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorOp {
    /// Hue rotation, degrees
    Hue(f32),
    /// Saturation multiplier
    Sat(f32),
    /// Brightness multiplier
    Brightness(f32),
}

/// `count * { transforms }`; a count of 1 serializes as a plain block
#[derive(Debug, Clone, PartialEq)]
pub struct TransformLoop {
    pub count: u32,
    pub transforms: Vec<Transform>,
}

impl TransformLoop {
    /// Single application of `transforms`
    pub fn once(transforms: Vec<Transform>) -> Self {
        Self {
            count: 1,
            transforms,
        }
    }

    /// `count` repeated, compounding applications of `transforms`
    pub fn repeat(count: u32, transforms: Vec<Transform>) -> Self {
        Self { count, transforms }
    }
}

/// What a call ultimately instances
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Reference to a named rule
    Rule(String),
    /// Terminal primitive
    Primitive(Primitive),
}

/// One production statement: transform loops, color block, target
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub loops: Vec<TransformLoop>,
    pub paint: Vec<ColorOp>,
    pub target: Target,
}

impl Call {
    /// Bare reference to `rule` with no transforms
    pub fn rule(rule: &str) -> Self {
        Self {
            loops: Vec::new(),
            paint: Vec::new(),
            target: Target::Rule(rule.to_string()),
        }
    }

    /// Bare primitive with no transforms
    pub fn primitive(primitive: Primitive) -> Self {
        Self {
            loops: Vec::new(),
            paint: Vec::new(),
            target: Target::Primitive(primitive),
        }
    }

    /// Append a transform loop
    pub fn with_loop(mut self, transform_loop: TransformLoop) -> Self {
        self.loops.push(transform_loop);
        self
    }

    /// Append a single-application transform block
    pub fn with_transforms(self, transforms: Vec<Transform>) -> Self {
        self.with_loop(TransformLoop::once(transforms))
    }

    /// Set the color block
    pub fn with_paint(mut self, paint: Vec<ColorOp>) -> Self {
        self.paint = paint;
        self
    }
}

/// `rule name [maxdepth n] [w weight] { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDef {
    pub name: String,
    pub max_depth: Option<u32>,
    pub weight: Option<f32>,
    pub comment: Option<String>,
    pub body: Vec<Call>,
}

impl RuleDef {
    pub fn new(name: &str, body: Vec<Call>) -> Self {
        Self {
            name: name.to_string(),
            max_depth: None,
            weight: None,
            comment: None,
            body,
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }
}

/// Global `set` directives
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
    MaxDepth(u32),
    MaxObjects(u32),
    Seed(u32),
    /// Hex color such as `#000000`
    Background(String),
}

/// Top-level script statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Multi-line `/* ... */` banner
    Banner(Vec<String>),
    /// Single `//` comment line
    Comment(String),
    /// Empty line
    Blank,
    Setting(Setting),
    Rule(RuleDef),
    /// Top-level invocation (the start rule)
    Call(Call),
}

/// A complete generative-geometry script
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Script {
    pub statements: Vec<Statement>,
}

impl Script {
    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    /// Rule definitions named `name` (weighted variants share a name)
    pub fn rules<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a RuleDef> + 'a {
        self.statements.iter().filter_map(move |statement| match statement {
            Statement::Rule(rule) if rule.name == name => Some(rule),
            _ => None,
        })
    }

    /// Calls made outside any rule
    pub fn top_level_calls(&self) -> impl Iterator<Item = &Call> {
        self.statements.iter().filter_map(|statement| match statement {
            Statement::Call(call) => Some(call),
            _ => None,
        })
    }
}
