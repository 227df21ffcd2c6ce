//! Automata Tutor - finite automata editor
//! Draw states and transitions on a canvas and test words against the
//! automaton as a DFA or an NFA

use eframe::egui;
use egui::{pos2, vec2, Color32, Pos2, Stroke, Vec2};

use automata_tutor::{
    Automaton, EdgeRouter, EditMode, Editor, Mode, Route, State, TestReport,
};

fn app_icon() -> egui::IconData {
    // 64x64 accepting state: light disc with a double ring.
    let w: u32 = 64;
    let h: u32 = 64;
    let mut rgba = vec![0u8; (w * h * 4) as usize];
    let c = (w as f32 - 1.0) * 0.5;

    for y in 0..h {
        for x in 0..w {
            let d = (x as f32 - c).hypot(y as f32 - c);
            let on_ring = (27.0..=30.0).contains(&d) || (21.0..=23.0).contains(&d);
            let (r, g, b, a): (u8, u8, u8, u8) = if on_ring {
                (30, 40, 60, 255)
            } else if d < 30.0 {
                (225, 235, 250, 255)
            } else {
                (0, 0, 0, 0)
            };
            let idx = ((y * w + x) * 4) as usize;
            rgba[idx..idx + 4].copy_from_slice(&[r, g, b, a]);
        }
    }

    egui::IconData { rgba, width: w, height: h }
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 750.0])
            .with_title("Automata Tutor - DFA/NFA Editor")
            .with_icon(app_icon()),
        ..Default::default()
    };

    eframe::run_native(
        "Automata Tutor",
        options,
        Box::new(|cc| Ok(Box::new(TutorApp::new(cc)))),
    )
}

/// Colours and sizes used when painting the canvas
#[derive(Clone, Debug)]
struct CanvasStyle {
    background: Color32,
    state_fill: Color32,
    selected_fill: Color32,
    visited_fill: Color32,
    accepted_fill: Color32,
    rejected_fill: Color32,
    outline: Color32,
    edge: Color32,
    label_text: Color32,
    label_background: Color32,
    hint_text: Color32,
    stroke_width: f32,
    /// Gap between the two rings of an accepting state
    accepting_inset: f32,
    /// Length of the arrow pointing into the initial state
    initial_arrow: f32,
    state_font_size: f32,
    label_font_size: f32,
    /// Pieces used to flatten a self-loop arc
    loop_segments: usize,
}

impl Default for CanvasStyle {
    fn default() -> Self {
        Self {
            background: Color32::WHITE,
            state_fill: Color32::from_rgb(250, 250, 250),
            selected_fill: Color32::from_rgb(173, 216, 230),
            visited_fill: Color32::from_rgb(255, 243, 176),
            accepted_fill: Color32::from_rgb(170, 225, 170),
            rejected_fill: Color32::from_rgb(240, 170, 170),
            outline: Color32::BLACK,
            edge: Color32::from_rgb(40, 40, 40),
            label_text: Color32::from_rgb(20, 20, 140),
            label_background: Color32::WHITE,
            hint_text: Color32::from_rgb(130, 130, 130),
            stroke_width: 1.5,
            accepting_inset: 5.0,
            initial_arrow: 30.0,
            state_font_size: 14.0,
            label_font_size: 13.0,
            loop_segments: 32,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HelpTopic {
    About,
    QuickGuide,
    Dfa,
    Nfa,
    Comparison,
}

impl HelpTopic {
    const ALL: [HelpTopic; 5] = [
        HelpTopic::About,
        HelpTopic::QuickGuide,
        HelpTopic::Dfa,
        HelpTopic::Nfa,
        HelpTopic::Comparison,
    ];

    fn title(self) -> &'static str {
        match self {
            HelpTopic::About => "About",
            HelpTopic::QuickGuide => "Quick guide",
            HelpTopic::Dfa => "What is a DFA?",
            HelpTopic::Nfa => "What is an NFA?",
            HelpTopic::Comparison => "DFA vs NFA",
        }
    }

    fn text(self) -> &'static str {
        match self {
            HelpTopic::About => {
                "Automata Tutor\n\n\
                 An interactive editor for deterministic and nondeterministic \
                 finite automata. Build an automaton on the canvas, then test \
                 input words and follow the run step by step."
            }
            HelpTopic::QuickGuide => {
                "1. Pick \"Add state\" and click on the canvas to place states.\n\
                 2. Pick \"Add transition\", click the source state, then the \
                 target state, and enter the symbol(s). Several symbols are \
                 separated by commas, e.g. 0,1. Clicking the same state twice \
                 creates a self-loop.\n\
                 3. Pick \"Set initial state\" and click the start state.\n\
                 4. Pick \"Toggle accepting state\" and click every final state.\n\
                 5. Type a word into the test panel and press Test or Enter.\n\n\
                 \"Move\" drags states around, \"Delete\" removes a state \
                 together with its transitions."
            }
            HelpTopic::Dfa => {
                "A deterministic finite automaton (DFA) is always in exactly \
                 one state. For every state and input symbol there is at most \
                 one transition to follow.\n\n\
                 The automaton reads the word symbol by symbol. If a symbol has \
                 no transition the run is blocked and the word is rejected. The \
                 word is accepted if the run ends in an accepting state."
            }
            HelpTopic::Nfa => {
                "A nondeterministic finite automaton (NFA) may have several \
                 transitions on the same symbol out of one state.\n\n\
                 It follows all possibilities at once: after each symbol it is \
                 in a set of states. The word is accepted if at least one \
                 possible run ends in an accepting state. If the set becomes \
                 empty, the word is rejected."
            }
            HelpTopic::Comparison => {
                "Every DFA is also an NFA. Conversely, every NFA can be turned \
                 into an equivalent DFA by the subset construction, so both \
                 recognise exactly the regular languages.\n\n\
                 NFAs are often smaller and easier to design, for example for \
                 \"contains 01\". The equivalent DFA can need up to 2^n states \
                 for an NFA with n states.\n\n\
                 Tick the NFA checkbox to switch how words are tested; the \
                 automaton itself stays unchanged."
            }
        }
    }
}

/// How a state is highlighted on the canvas
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Highlight {
    None,
    Selected,
    Visited,
    FinalAccepted,
    FinalRejected,
}

struct TutorApp {
    automaton: Automaton,
    editor: Editor,
    router: EdgeRouter,
    style: CanvasStyle,
    /// Word typed into the test panel
    test_input: String,
    /// Result of the last test, cleared when the automaton changes
    report: Option<TestReport>,
    /// Text of the open label prompt
    label_input: String,
    /// Focus the label prompt on the next frame
    focus_label: bool,
    help: Option<HelpTopic>,
}

impl TutorApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            automaton: Automaton::new(),
            editor: Editor::new(),
            router: EdgeRouter::default(),
            style: CanvasStyle::default(),
            test_input: String::new(),
            report: None,
            label_input: String::new(),
            focus_label: false,
            help: None,
        }
    }

    fn run_test(&mut self) {
        if self.automaton.initial_state().is_none() {
            rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Warning)
                .set_title("No initial state")
                .set_description("Please set an initial state before testing a word.")
                .set_buttons(rfd::MessageButtons::Ok)
                .show();
            return;
        }

        let report = self.automaton.test(&self.test_input);
        log::info!(
            "{} test of {:?}: {}",
            report.mode,
            report.input,
            if report.accepted { "accepted" } else { "rejected" }
        );
        self.report = Some(report);
    }

    fn confirm_clear(&mut self) {
        let answer = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Warning)
            .set_title("Clear automaton")
            .set_description("Remove all states and transitions?")
            .set_buttons(rfd::MessageButtons::YesNo)
            .show();
        if matches!(answer, rfd::MessageDialogResult::Yes) {
            self.editor.clear(&mut self.automaton);
            self.report = None;
        }
    }

    fn highlight(&self, state: &State) -> Highlight {
        if self.editor.selected() == Some(state.id()) {
            return Highlight::Selected;
        }
        let Some(report) = &self.report else {
            return Highlight::None;
        };
        if report.final_state() == Some(state.id()) {
            if report.accepted {
                Highlight::FinalAccepted
            } else {
                Highlight::FinalRejected
            }
        } else if report.trace.iter().any(|id| id == state.id()) {
            Highlight::Visited
        } else {
            Highlight::None
        }
    }

    fn control_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Tools");
        ui.add_space(4.0);
        for mode in EditMode::ALL {
            if ui
                .selectable_label(self.editor.mode() == mode, mode.label())
                .clicked()
            {
                self.editor.set_mode(mode);
            }
        }

        ui.separator();
        let mut nfa = self.automaton.is_nondeterministic();
        if ui.checkbox(&mut nfa, "Nondeterministic (NFA)").changed() {
            let mode = if nfa {
                Mode::Nondeterministic
            } else {
                Mode::Deterministic
            };
            self.automaton.set_mode(mode);
            self.report = None;
        }
        ui.label(
            egui::RichText::new(format!("Mode: {}", self.automaton.mode().abbreviation())).strong(),
        );

        ui.separator();
        ui.label(format!("States: {}", self.automaton.state_count()));
        ui.label(format!("Transitions: {}", self.automaton.transition_count()));
        let alphabet: Vec<&str> = self.automaton.alphabet().collect();
        ui.label(format!("Alphabet: {{{}}}", alphabet.join(", ")));
        if let Some(initial) = self.automaton.initial_state() {
            ui.label(format!("Initial: {}", initial.id()));
        }

        ui.separator();
        if ui.button("Clear all").clicked() {
            self.confirm_clear();
        }
    }

    fn test_panel(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Input word:");
            let edit = ui.add(egui::TextEdit::singleline(&mut self.test_input).desired_width(260.0));
            let entered = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Test").clicked() || entered {
                self.run_test();
            }
            if let Some(report) = &self.report {
                let (verdict, color) = if report.accepted {
                    ("ACCEPTED", Color32::from_rgb(0, 140, 0))
                } else {
                    ("REJECTED", Color32::from_rgb(190, 0, 0))
                };
                ui.separator();
                ui.colored_label(color, egui::RichText::new(verdict).strong());
                ui.label(format!("({})", report.mode.abbreviation()));
            }
        });
        ui.separator();
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| match &self.report {
                Some(report) => {
                    ui.monospace(report.to_string());
                }
                None => {
                    ui.weak("Enter a word and press Test to see the run step by step.");
                }
            });
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;
        let origin = rect.min.to_vec2();
        let to_canvas = |pos: Pos2| {
            let p = pos - origin;
            (p.x.round() as i32, p.y.round() as i32)
        };

        let (pressed, released, pointer) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
            )
        });
        if pressed && response.hovered() {
            if let Some(pos) = pointer.filter(|p| rect.contains(*p)) {
                let (x, y) = to_canvas(pos);
                if self.editor.mode() != EditMode::Select {
                    self.report = None;
                }
                self.editor.press(&mut self.automaton, x, y);
                if self.editor.pending_transition().is_some() {
                    self.focus_label = true;
                }
            }
        }
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                let (x, y) = to_canvas(pos);
                self.editor.drag(&mut self.automaton, x, y);
            }
        }
        if released {
            self.editor.release();
        }

        painter.rect_filled(rect, 0.0, self.style.background);

        let routes = self.router.routes(&self.automaton);
        for (_, route) in &routes {
            draw_route(&painter, route, origin, &self.style);
        }
        for state in self.automaton.states() {
            let initial = self.automaton.is_initial(state.id());
            draw_state(&painter, state, origin, self.highlight(state), initial, &self.style);
        }
        for (transition, route) in &routes {
            draw_label(&painter, route.label_pos() + origin, transition.label(), &self.style);
        }

        painter.text(
            rect.left_bottom() + vec2(8.0, -8.0),
            egui::Align2::LEFT_BOTTOM,
            mode_hint(self.editor.mode()),
            egui::FontId::proportional(12.0),
            self.style.hint_text,
        );
    }

    fn label_prompt(&mut self, ctx: &egui::Context) {
        let Some(pending) = self.editor.pending_transition().cloned() else {
            return;
        };

        let mut answer: Option<Option<String>> = None;
        egui::Window::new("New transition")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(format!(
                    "Symbol(s) for {} \u{2192} {} (separate several with commas):",
                    pending.source, pending.target
                ));
                let edit = ui.text_edit_singleline(&mut self.label_input);
                if self.focus_label {
                    edit.request_focus();
                    self.focus_label = false;
                }
                let (enter, escape) =
                    ui.input(|i| (i.key_pressed(egui::Key::Enter), i.key_pressed(egui::Key::Escape)));
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() || (edit.lost_focus() && enter) {
                        answer = Some(Some(self.label_input.clone()));
                    }
                    if ui.button("Cancel").clicked() || escape {
                        answer = Some(None);
                    }
                });
            });

        if let Some(answer) = answer {
            if let Some(transition) = self.editor.submit_label(&mut self.automaton, answer.as_deref()) {
                log::info!("Added transition {transition}");
            }
            self.label_input.clear();
            self.report = None;
        }
    }

    fn help_window(&mut self, ctx: &egui::Context) {
        let Some(topic) = self.help else {
            return;
        };
        let mut open = true;
        egui::Window::new(topic.title())
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_width(420.0)
            .show(ctx, |ui| {
                ui.label(topic.text());
            });
        if !open {
            self.help = None;
        }
    }
}

impl eframe::App for TutorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        ui.close_menu();
                    }
                });
                ui.menu_button("Edit", |ui| {
                    if ui.button("Clear automaton...").clicked() {
                        ui.close_menu();
                        self.confirm_clear();
                    }
                });
                ui.menu_button("Help", |ui| {
                    for topic in HelpTopic::ALL {
                        if ui.button(topic.title()).clicked() {
                            self.help = Some(topic);
                            ui.close_menu();
                        }
                    }
                });
            });
        });

        egui::SidePanel::right("control_panel")
            .resizable(false)
            .default_width(210.0)
            .show(ctx, |ui| self.control_panel(ui));

        egui::TopBottomPanel::bottom("test_panel")
            .resizable(true)
            .default_height(170.0)
            .min_height(110.0)
            .show(ctx, |ui| self.test_panel(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.canvas(ui));

        self.label_prompt(ctx);
        self.help_window(ctx);
    }
}

fn mode_hint(mode: EditMode) -> &'static str {
    match mode {
        EditMode::Select => "Drag a state to move it",
        EditMode::AddState => "Click on empty canvas to add a state",
        EditMode::AddTransition => "Click the source state, then the target state",
        EditMode::SetInitial => "Click a state to make it the initial state",
        EditMode::ToggleAccepting => "Click a state to toggle whether it accepts",
        EditMode::Delete => "Click a state to delete it with its transitions",
    }
}

fn draw_route(painter: &egui::Painter, route: &Route, origin: Vec2, style: &CanvasStyle) {
    let stroke = Stroke::new(style.stroke_width, style.edge);

    match route {
        Route::Curved(curve) => {
            painter.add(egui::epaint::QuadraticBezierShape::from_points_stroke(
                [curve.start + origin, curve.control + origin, curve.end + origin],
                false,
                Color32::TRANSPARENT,
                stroke,
            ));
        }
        _ => {
            let points = route
                .polyline(style.loop_segments)
                .into_iter()
                .map(|p| p + origin)
                .collect();
            painter.add(egui::Shape::line(points, stroke));
        }
    }

    let arrow = route.arrow();
    for barb in arrow.barbs {
        painter.line_segment([arrow.tip + origin, barb + origin], stroke);
    }
}

/// Draw a transition label on a small opaque background
fn draw_label(painter: &egui::Painter, pos: Pos2, text: &str, style: &CanvasStyle) {
    let galley = painter.layout_no_wrap(
        text.to_owned(),
        egui::FontId::proportional(style.label_font_size),
        style.label_text,
    );
    let rect = egui::Rect::from_center_size(pos, galley.size() + vec2(4.0, 2.0));
    painter.rect_filled(rect, 0.0, style.label_background);
    painter.galley(rect.min + vec2(2.0, 1.0), galley, style.label_text);
}

fn draw_state(
    painter: &egui::Painter,
    state: &State,
    origin: Vec2,
    highlight: Highlight,
    is_initial: bool,
    style: &CanvasStyle,
) {
    let position = state.position();
    let center = pos2(position.x as f32, position.y as f32) + origin;
    let radius = State::RADIUS as f32;
    let stroke = Stroke::new(style.stroke_width, style.outline);

    let fill = match highlight {
        Highlight::None => style.state_fill,
        Highlight::Selected => style.selected_fill,
        Highlight::Visited => style.visited_fill,
        Highlight::FinalAccepted => style.accepted_fill,
        Highlight::FinalRejected => style.rejected_fill,
    };
    painter.circle(center, radius, fill, stroke);

    if state.is_accepting() {
        painter.circle_stroke(center, radius - style.accepting_inset, stroke);
    }

    if is_initial {
        let tip = center - vec2(radius, 0.0);
        painter.line_segment([tip - vec2(style.initial_arrow, 0.0), tip], stroke);
        painter.line_segment([tip, tip + vec2(-8.0, -5.0)], stroke);
        painter.line_segment([tip, tip + vec2(-8.0, 5.0)], stroke);
    }

    painter.text(
        center,
        egui::Align2::CENTER_CENTER,
        state.id(),
        egui::FontId::proportional(style.state_font_size),
        style.outline,
    );
}
