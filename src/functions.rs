use std::collections::HashMap;
use std::sync::LazyLock;

pub type NativeFunction = fn(f64) -> f64;

static FUNCTIONS: LazyLock<HashMap<&'static str, NativeFunction>> = LazyLock::new(|| {
    let mut functions: HashMap<_, NativeFunction> = HashMap::new();

    functions.insert("sin", sin);
    functions.insert("cos", cos);
    functions.insert("tan", tan);
    functions.insert("log", log);
    functions.insert("sqrt", sqrt);
    functions.insert("abs", abs);

    functions
});

/// Looks up a single-argument function by name, ignoring ASCII case.
pub fn lookup(name: &str) -> Option<NativeFunction> {
    FUNCTIONS.get(name.to_ascii_lowercase().as_str()).copied()
}

fn sin(x: f64) -> f64 {
    x.sin()
}

fn cos(x: f64) -> f64 {
    x.cos()
}

fn tan(x: f64) -> f64 {
    x.tan()
}

// Natural logarithm
fn log(x: f64) -> f64 {
    x.ln()
}

fn sqrt(x: f64) -> f64 {
    x.sqrt()
}

fn abs(x: f64) -> f64 {
    x.abs()
}
