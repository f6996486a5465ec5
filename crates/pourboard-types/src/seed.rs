//! Starter board contents.

/// Names inserted, in this order, when the store is found empty on startup.
pub const DEFAULT_ITEM_NAMES: [&str; 10] = [
    "Malbec",
    "Cabernet Sauvignon",
    "Merlot",
    "Syrah",
    "Bonarda",
    "Chardonnay",
    "Sauvignon Blanc",
    "Torrontés",
    "Pinot Noir",
    "Rosado",
];
