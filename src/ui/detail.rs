// ============================================================================
// Detail - Rendu du détail d'une transaction
// ============================================================================
// Affiche tous les champs de la transaction sélectionnée, en lecture
// seule (le view model n'active jamais edit_mode)
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

/// Dessine la vue détail de la transaction sélectionnée
///
/// Esc ou Espace ramènent au dashboard. Si l'index de sélection est
/// périmé (reload entre-temps), affiche un écran vide avec le footer.
pub fn render_transaction_detail(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Détail : tout l'espace
            Constraint::Length(3), // Footer : 3 lignes
        ])
        .split(area);

    render_detail_body(frame, app, chunks[0]);
    render_detail_footer(frame, chunks[1]);
}

/// Dessine le corps du détail (tous les champs du record)
fn render_detail_body(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 🔍 Transaction ")
        .title_alignment(Alignment::Center);

    let Some(tx) = app.selected_transaction() else {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Aucune transaction sélectionnée",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center);

        frame.render_widget(paragraph, area);
        return;
    };

    // edit_mode n'est jamais activé : seule la branche lecture seule
    // existe à l'affichage
    let mode_label = if app.edit_mode {
        "édition"
    } else {
        "lecture seule"
    };

    let status = if tx.is_verified() {
        Span::styled("vérifiée ✓", Style::default().fg(Color::Green))
    } else {
        Span::styled("en attente …", Style::default().fg(Color::Yellow))
    };

    // Annotation éventuelle du view model (le map history reste vide
    // tant qu'aucune opération ne le remplit)
    let note = app
        .history
        .get(&tx.id.to_string())
        .map(String::as_str)
        .unwrap_or("—");

    let label_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    let text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Id        : ", label_style),
            Span::raw(tx.id.to_string()),
        ]),
        Line::from(vec![
            Span::styled("  Date      : ", label_style),
            Span::raw(tx.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        ]),
        Line::from(vec![
            Span::styled("  Montant   : ", label_style),
            Span::raw(format!("{:.8} BTC", tx.amount)),
        ]),
        Line::from(vec![
            Span::styled("  Payeur    : ", label_style),
            Span::raw(tx.payer.clone()),
        ]),
        Line::from(vec![
            Span::styled("  Bénéfici. : ", label_style),
            Span::raw(tx.payee.clone()),
        ]),
        Line::from(vec![
            Span::styled("  Statut    : ", label_style),
            status,
        ]),
        Line::from(vec![
            Span::styled("  Note      : ", label_style),
            Span::raw(note),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("  Mode : {}", mode_label),
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}

/// Dessine le footer de la vue détail
fn render_detail_footer(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let shortcuts = Line::from(vec![
        Span::styled(
            "[ESC / Space]",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Back  "),
        Span::styled(
            "[q]",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Quit"),
    ]);

    let paragraph = Paragraph::new(vec![shortcuts])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
