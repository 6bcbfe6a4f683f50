// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI (le view model)
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Partage : la structure est placée derrière Arc<Mutex<>> et lue par
//    le rendu à chaque frame (store explicite au lieu du data binding
//    bidirectionnel d'un framework)
//
// PATTERN : Cette structure suit le pattern "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Le contrôleur et le gestionnaire d'événements écrivent dedans
// ============================================================================

use std::collections::HashMap;

use crate::models::ServerTransaction;

// ============================================================================
// Enum : Screen
// ============================================================================
// CONCEPT RUST : Enums pour state machines
// - Représente les différents écrans de l'application
// - Un seul écran actif à la fois
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : liste des transactions du serveur
    Dashboard,

    /// Vue détail : tous les champs de la transaction sélectionnée
    DetailView,
}

/// État principal de l'application
///
/// Les trois premiers champs après `running` forment le view model lié
/// par le contrôleur : `history`, `edit_mode` et `transactions`.
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Annotations de vue par transaction (clé = id)
    /// État réservé : aucune opération ne le remplit pour l'instant,
    /// la vue détail y lit une éventuelle note et n'en trouve jamais
    pub history: HashMap<String, String>,

    /// Mode édition du view model
    /// Initialisé à false et jamais muté par aucune opération ; la vue
    /// détail le lit pour choisir le rendu lecture seule
    pub edit_mode: bool,

    /// Historique des transactions du serveur
    /// Vide au départ, remplacé en bloc quand le fetch distant résout
    pub transactions: Vec<ServerTransaction>,

    /// Index de la transaction sélectionnée dans la liste
    pub selected_index: usize,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Indique si l'utilisateur a demandé à quitter (attend confirmation)
    /// CONCEPT : Two-step quit pour éviter les sorties accidentelles
    /// - Première pression de 'q' : confirm_quit = true
    /// - Deuxième pression de 'q' : running = false (quit réel)
    /// - N'importe quelle autre touche : confirm_quit = false (annulation)
    pub confirm_quit: bool,

    /// Indique si un chargement est en cours (posé par le worker)
    pub is_loading: bool,

    /// Message de chargement optionnel affiché dans le footer
    pub loading_message: Option<String>,
}

impl App {
    /// Crée une nouvelle instance de App avec un historique vide
    ///
    /// CONCEPT RUST : Constructor pattern
    /// - Convention : fonction associée nommée "new()"
    /// - Initialise tous les champs avec des valeurs par défaut
    pub fn new() -> Self {
        Self {
            running: true,
            history: HashMap::new(),
            edit_mode: false,
            transactions: Vec::new(),
            selected_index: 0,
            current_screen: Screen::Dashboard,
            confirm_quit: false,
            is_loading: false,
            loading_message: None,
        }
    }

    /// Réinitialise le view model à ses valeurs par défaut
    ///
    /// Appelé par le contrôleur à sa construction : history vidé,
    /// edit_mode à false, liste de transactions vide.
    pub fn reset_history_view(&mut self) {
        self.history = HashMap::new();
        self.edit_mode = false;
        self.transactions = Vec::new();
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Navigue vers le haut dans la liste
    ///
    /// CONCEPT RUST : Saturating arithmetic
    /// - saturating_sub() : soustrait mais ne descend pas en dessous de 0
    /// - Évite les panics avec les unsigned
    pub fn navigate_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Navigue vers le bas dans la liste
    ///
    /// CONCEPT RUST : min() pour éviter le dépassement
    /// - Limite l'index à transactions.len() - 1
    /// - saturating_sub(1) gère le cas liste vide (0 - 1 = 0)
    pub fn navigate_down(&mut self) {
        let max_index = self.transactions.len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    /// Retourne la transaction sélectionnée
    ///
    /// CONCEPT RUST : Option<&T>
    /// - Retourne une référence (pas de copie)
    /// - None si la liste est vide ou l'index périmé après un reload
    pub fn selected_transaction(&self) -> Option<&ServerTransaction> {
        self.transactions.get(self.selected_index)
    }

    /// Tick : appelé à chaque itération de la boucle
    ///
    /// CONCEPT : Event Loop Pattern
    /// - tick() est appelé régulièrement (chaque frame)
    /// - Permet de mettre à jour l'état même sans événement utilisateur
    pub fn tick(&mut self) {
        // Rien à faire à chaque tick pour l'instant
    }

    /// Affiche la vue détail de la transaction sélectionnée
    pub fn show_detail(&mut self) {
        self.current_screen = Screen::DetailView;
    }

    /// Retourne à la vue dashboard
    pub fn show_dashboard(&mut self) {
        self.current_screen = Screen::Dashboard;
    }

    /// Vérifie si on est sur le dashboard
    pub fn is_on_dashboard(&self) -> bool {
        self.current_screen == Screen::Dashboard
    }

    /// Vérifie si on est sur la vue détail
    pub fn is_on_detail(&self) -> bool {
        self.current_screen == Screen::DetailView
    }

    /// Demande la confirmation de quitter
    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    /// Annule la demande de quit
    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    /// Vérifie si on attend la confirmation de quit
    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    /// Démarre le chargement avec un message optionnel
    ///
    /// CONCEPT : Loading state management
    /// - Active is_loading pour afficher l'indicateur dans le footer
    pub fn start_loading(&mut self, message: Option<String>) {
        self.is_loading = true;
        self.loading_message = message;
    }

    /// Termine le chargement
    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.loading_message = None;
    }

    /// Vérifie si un chargement est en cours
    pub fn is_loading_data(&self) -> bool {
        self.is_loading
    }
}

// ============================================================================
// Trait Default
// ============================================================================
// Convention Rust : si new() ne prend pas de paramètres, implémenter Default
// ============================================================================

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn tx(id: u64) -> ServerTransaction {
        ServerTransaction {
            id,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 12, 14, 3, 0).unwrap(),
            amount: 0.05,
            payer: "alice".to_string(),
            payee: "bob".to_string(),
            verified: true,
        }
    }

    #[test]
    fn test_app_creation_defaults() {
        let app = App::new();

        assert!(app.is_running());
        assert!(app.history.is_empty());
        assert!(!app.edit_mode);
        assert!(app.transactions.is_empty());
        assert_eq!(app.selected_index, 0);
        assert!(app.is_on_dashboard());
    }

    #[test]
    fn test_reset_history_view() {
        let mut app = App::new();
        app.transactions = vec![tx(1), tx(2)];
        app.history.insert("1".to_string(), "note".to_string());

        app.reset_history_view();

        assert!(app.history.is_empty());
        assert!(!app.edit_mode);
        assert!(app.transactions.is_empty());
    }

    #[test]
    fn test_app_quit_two_step() {
        let mut app = App::new();
        assert!(app.is_running());

        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        assert!(app.is_running());

        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());

        app.quit();
        assert!(!app.is_running());
    }

    #[test]
    fn test_navigation() {
        let mut app = App::new();
        app.transactions = vec![tx(1), tx(2), tx(3)];

        // Au début, on est à l'index 0
        assert_eq!(app.selected_index, 0);

        app.navigate_down();
        assert_eq!(app.selected_index, 1);

        app.navigate_down();
        assert_eq!(app.selected_index, 2);

        // Navigate down au max : reste à 2
        app.navigate_down();
        assert_eq!(app.selected_index, 2);

        app.navigate_up();
        assert_eq!(app.selected_index, 1);

        app.navigate_up();
        assert_eq!(app.selected_index, 0);

        // Navigate up au min : reste à 0
        app.navigate_up();
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_navigation_empty_list() {
        let mut app = App::new();

        app.navigate_down();
        assert_eq!(app.selected_index, 0);
        assert!(app.selected_transaction().is_none());
    }

    #[test]
    fn test_selected_transaction() {
        let mut app = App::new();
        app.transactions = vec![tx(1), tx(2)];
        app.navigate_down();

        assert_eq!(app.selected_transaction().unwrap().id, 2);
    }

    #[test]
    fn test_screen_transitions() {
        let mut app = App::new();
        assert!(app.is_on_dashboard());

        app.show_detail();
        assert!(app.is_on_detail());

        app.show_dashboard();
        assert!(app.is_on_dashboard());
    }

    #[test]
    fn test_loading_state() {
        let mut app = App::new();
        assert!(!app.is_loading_data());

        app.start_loading(Some("Chargement…".to_string()));
        assert!(app.is_loading_data());
        assert!(app.loading_message.is_some());

        app.stop_loading();
        assert!(!app.is_loading_data());
        assert!(app.loading_message.is_none());
    }
}
