use novella_script::CommandKind;

#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    ShowMessage { text: String },
    ShowDialogue { name: String, voice: Option<String>, content: String },
    ShowChoice { options: Vec<String> },

    /// A command the executor does not interpret itself, handed to the
    /// renderer as written.
    Command { kind: CommandKind, keyword: Option<String>, params: Vec<String> },

    /// A subroutine returned to a menu screen instead of a script location.
    ReturnToGui { name: String },
    ScriptLoaded { name: String },

    StepDone,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ChoiceMade { index: usize },
    Continue,
    Exit,
    SaveRequest { slot: u32 },
    LoadRequest { slot: u32 },
}
