#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Graph {
    Cpu,
    Memory,
    Network,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerMove {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    ToggleGraph(Graph),
    OpenInterfacePicker,
    MovePicker(PickerMove),
    ApplyPicker,
    ClosePicker,
    ToggleHelp,
    Refresh,
    None,
}
