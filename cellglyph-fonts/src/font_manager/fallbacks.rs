//! Fallback families consulted after the primary monospace face.
//!
//! The list leans towards faces with wide combining-mark and symbol
//! coverage, since a cell's marks are shaped together with their base.

/// Fallback font families in priority order.
pub const FALLBACK_FAMILIES: &[&str] = &[
    // Monospace faces with broad Latin/Greek/Cyrillic mark coverage
    "DejaVu Sans Mono",
    "Noto Sans Mono",
    "Liberation Mono",
    "Menlo",
    "Consolas",
    // CJK
    "Noto Sans CJK JP",
    "Noto Sans CJK SC",
    "Microsoft YaHei",
    // Symbols
    "Symbols Nerd Font",
    "Noto Sans Symbols",
    "Noto Sans Symbols 2",
    "Segoe UI Symbol",
    "Symbola",
    // General coverage
    "DejaVu Sans",
    "Arial Unicode MS",
];
