// ============================================================================
// Module : models
// ============================================================================
// Ce module contient les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod transaction; // Déclaration du module transaction (fichier transaction.rs)

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use lazyhistory::models::transaction::ServerTransaction;
// On peut faire : use lazyhistory::models::ServerTransaction;
pub use transaction::ServerTransaction;
