// ============================================================================
// LazyHistory - Library
// ============================================================================
// Expose les modules publics pour les tests et la binary
// ============================================================================

pub mod api;        // Accès aux données du serveur (trait + client HTTP)
pub mod models;     // Structures de données
pub mod app;        // État de l'application (view model)
pub mod controller; // Contrôleur de l'historique (load-and-bind)
pub mod ui;         // Interface utilisateur
