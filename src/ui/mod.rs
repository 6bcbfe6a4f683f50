// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod events;    // Gestion des événements clavier
pub mod dashboard; // Rendu de la liste des transactions
pub mod detail;    // Rendu du détail d'une transaction

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};
pub use dashboard::render;
