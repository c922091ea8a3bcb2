//! Module Graph
//!
//! Tracks, per emitted module:
//! - the names it imports, and which entity each import alias stands for
//! - the entities it exports, in emission order
//! - the modules it depends on
//!
//! plus the program-wide deferred output (footer statements, globals mapping)
//! that must be written after every declaration. Cycles are recorded as-is;
//! `detect_circular_dependencies` and `topological_sort` are there for the
//! consumers that have to report or order them.

use indexmap::{IndexMap, IndexSet};
use j2ts_common::EntityId;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Unique identifier for a module in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub u32);

impl ModuleId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Information about a module in the dependency graph
#[derive(Debug)]
pub struct ModuleInfo {
    /// Unique identifier
    pub id: ModuleId,
    /// Module name (e.g. `lib/util` or a package name in bundle mode)
    pub name: String,
    /// Target names imported by this module
    pub imported_names: IndexSet<String>,
    /// Source entity to the alias it was first imported under
    pub imported_elements: IndexMap<EntityId, String>,
    /// Exported entities, duplicates included, in emission order
    pub exported_elements: Vec<EntityId>,
    /// Modules this module imports from
    pub dependencies: FxHashSet<ModuleId>,
    /// Modules that import this module
    pub dependents: FxHashSet<ModuleId>,
}

impl ModuleInfo {
    /// Create a new module info
    pub fn new(id: ModuleId, name: String) -> Self {
        Self {
            id,
            name,
            imported_names: IndexSet::new(),
            imported_elements: IndexMap::new(),
            exported_elements: Vec::new(),
            dependencies: FxHashSet::default(),
            dependents: FxHashSet::default(),
        }
    }

    pub fn is_imported_name(&self, name: &str) -> bool {
        self.imported_names.contains(name)
    }

    /// Alias under which `entity` was imported, if it was.
    pub fn imported_alias(&self, entity: EntityId) -> Option<&str> {
        self.imported_elements.get(&entity).map(String::as_str)
    }
}

/// Circular dependency information
#[derive(Debug, Clone)]
pub struct CircularDependency {
    /// Modules forming the cycle
    pub cycle: Vec<ModuleId>,
    /// Module names for display
    pub names: Vec<String>,
}

/// Module dependency graph and deferred program-level output
#[derive(Debug, Default)]
pub struct ModuleGraph {
    /// All modules, indexed by id
    modules: Vec<ModuleInfo>,
    /// Module name to ID mapping
    name_to_id: FxHashMap<String, ModuleId>,
    /// Number of recorded dependency edges
    edge_count: usize,
    /// Detected circular dependencies
    circular_dependencies: Vec<CircularDependency>,
    /// External modules used by the program, in first-use order
    used_modules: IndexSet<String>,
    /// Statements emitted after every declaration
    footer_statements: VecDeque<String>,
    /// `var <to> = <from>;` aliases, in insertion order
    globals_mapping: IndexMap<String, String>,
    /// Names imported into the global namespace
    global_imports: FxHashSet<String>,
    /// Imported top-level packages (clash avoidance with locals in bundles)
    imported_top_packages: FxHashSet<String>,
}

impl ModuleGraph {
    /// Create a new empty module graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or get a module by name
    pub fn add_module(&mut self, name: &str) -> ModuleId {
        if let Some(&id) = self.name_to_id.get(name) {
            return id;
        }

        let id = ModuleId(self.modules.len() as u32);
        self.modules.push(ModuleInfo::new(id, name.to_string()));
        self.name_to_id.insert(name.to_string(), id);
        debug!(module = %name, id = id.0, "module added");
        id
    }

    /// Get a module by ID
    pub fn get_module(&self, id: ModuleId) -> Option<&ModuleInfo> {
        self.modules.get(id.index())
    }

    fn get_module_mut(&mut self, id: ModuleId) -> Option<&mut ModuleInfo> {
        self.modules.get_mut(id.index())
    }

    /// Get module ID by name
    pub fn get_module_id(&self, name: &str) -> Option<ModuleId> {
        self.name_to_id.get(name).copied()
    }

    /// Get a module by name
    pub fn get_module_by_name(&self, name: &str) -> Option<&ModuleInfo> {
        self.get_module_id(name).and_then(|id| self.get_module(id))
    }

    // =========================================================================
    // Imports and exports
    // =========================================================================

    /// Record that `module` imports `target_name`, standing for `source` when
    /// given.
    ///
    /// ```text
    /// import targetName = require("sourceName");
    /// ```
    ///
    /// Names are a set. An entity keeps the alias of its first registration.
    pub fn register_import(&mut self, module: ModuleId, source: Option<EntityId>, target_name: &str) {
        let Some(info) = self.get_module_mut(module) else {
            return;
        };
        if !info.imported_names.contains(target_name) {
            info.imported_names.insert(target_name.to_string());
        }
        if let Some(source) = source {
            if !info.imported_elements.contains_key(&source) {
                trace!(module = %info.name, alias = %target_name, "import alias");
                info.imported_elements.insert(source, target_name.to_string());
            }
        }
    }

    /// Forget every import of `module`, to re-plan its import list.
    pub fn clear_imports(&mut self, module: ModuleId) {
        if let Some(info) = self.get_module_mut(module) {
            info.imported_names.clear();
            info.imported_elements.clear();
        }
    }

    pub fn imported_names(&self, module: ModuleId) -> Option<&IndexSet<String>> {
        self.get_module(module).map(|m| &m.imported_names)
    }

    pub fn imported_elements(&self, module: ModuleId) -> Option<&IndexMap<EntityId, String>> {
        self.get_module(module).map(|m| &m.imported_elements)
    }

    /// Append an exported entity. Duplicates are kept.
    pub fn add_export(&mut self, module: ModuleId, entity: EntityId) {
        if let Some(info) = self.get_module_mut(module) {
            info.exported_elements.push(entity);
        }
    }

    pub fn exported_elements(&self, module: ModuleId) -> &[EntityId] {
        self.get_module(module)
            .map(|m| m.exported_elements.as_slice())
            .unwrap_or(&[])
    }

    // =========================================================================
    // Dependencies
    // =========================================================================

    /// Add a dependency edge. Cycles are accepted.
    pub fn register_dependency(&mut self, from: ModuleId, to: ModuleId) {
        if from.index() >= self.modules.len() || to.index() >= self.modules.len() {
            return;
        }
        if self.modules[from.index()].dependencies.insert(to) {
            self.edge_count += 1;
        }
        self.modules[to.index()].dependents.insert(from);
    }

    /// Detect circular dependencies using Tarjan's algorithm
    pub fn detect_circular_dependencies(&mut self) -> &[CircularDependency] {
        self.circular_dependencies.clear();

        let mut tarjan = Tarjan {
            index_counter: 0,
            stack: Vec::new(),
            on_stack: vec![false; self.modules.len()],
            indices: vec![None; self.modules.len()],
            lowlinks: vec![0; self.modules.len()],
            components: Vec::new(),
        };

        for module in &self.modules {
            if tarjan.indices[module.id.index()].is_none() {
                tarjan.strongconnect(&self.modules, module.id);
            }
        }

        for scc in tarjan.components {
            // Only report cycles (SCC with more than one node or self-loop)
            let is_cycle = scc.len() > 1
                || scc
                    .first()
                    .is_some_and(|&id| self.modules[id.index()].dependencies.contains(&id));
            if is_cycle {
                let names = scc
                    .iter()
                    .map(|id| self.modules[id.index()].name.clone())
                    .collect();
                self.circular_dependencies
                    .push(CircularDependency { cycle: scc, names });
            }
        }

        &self.circular_dependencies
    }

    /// Get topological sort of modules (for emission ordering)
    ///
    /// Returns modules in dependency order: modules with no dependencies come first,
    /// followed by modules that depend only on already-listed modules.
    pub fn topological_sort(&self) -> Result<Vec<ModuleId>, CircularDependencyError> {
        let mut state = vec![VisitState::New; self.modules.len()];
        let mut result = Vec::with_capacity(self.modules.len());
        let mut work: Vec<Frame> = Vec::new();

        for module in &self.modules {
            if state[module.id.index()] != VisitState::New {
                continue;
            }
            state[module.id.index()] = VisitState::Active;
            work.push(Frame::new(module));

            while let Some(frame) = work.last_mut() {
                let id = frame.id;
                let Some(dep) = frame.advance() else {
                    // Post-order: dependencies land before dependents
                    work.pop();
                    state[id.index()] = VisitState::Done;
                    result.push(id);
                    continue;
                };
                match state[dep.index()] {
                    VisitState::New => {
                        state[dep.index()] = VisitState::Active;
                        work.push(Frame::new(&self.modules[dep.index()]));
                    }
                    VisitState::Active => {
                        let mut cycle = vec![dep];
                        for frame in work.iter().rev() {
                            cycle.push(frame.id);
                            if frame.id == dep {
                                break;
                            }
                        }
                        return Err(CircularDependencyError { cycle });
                    }
                    VisitState::Done => {}
                }
            }
        }

        Ok(result)
    }

    /// Get all modules that depend on a given module (transitive)
    pub fn dependents_of(&self, id: ModuleId) -> FxHashSet<ModuleId> {
        self.reachable(id, |m| &m.dependents)
    }

    /// Get all dependencies of a module (transitive)
    pub fn dependencies_of(&self, id: ModuleId) -> FxHashSet<ModuleId> {
        self.reachable(id, |m| &m.dependencies)
    }

    fn reachable(
        &self,
        id: ModuleId,
        edges: impl Fn(&ModuleInfo) -> &FxHashSet<ModuleId>,
    ) -> FxHashSet<ModuleId> {
        let mut result = FxHashSet::default();
        let mut queue = VecDeque::new();

        if let Some(module) = self.get_module(id) {
            queue.extend(edges(module).iter().copied());
        }

        while let Some(current) = queue.pop_front() {
            if result.insert(current) {
                if let Some(module) = self.get_module(current) {
                    for &next in edges(module) {
                        if !result.contains(&next) {
                            queue.push_back(next);
                        }
                    }
                }
            }
        }

        result
    }

    /// Check if a module depends on another (directly or transitively)
    pub fn depends_on(&self, from: ModuleId, to: ModuleId) -> bool {
        self.dependencies_of(from).contains(&to)
    }

    // =========================================================================
    // Program-level output
    // =========================================================================

    /// Register an external module used by the program.
    pub fn register_used_module(&mut self, name: &str) {
        if !self.used_modules.contains(name) {
            self.used_modules.insert(name.to_string());
        }
    }

    pub fn used_modules(&self) -> &IndexSet<String> {
        &self.used_modules
    }

    pub fn append_footer_statement(&mut self, statement: impl Into<String>) {
        self.footer_statements.push_back(statement.into());
    }

    pub fn prepend_footer_statement(&mut self, statement: impl Into<String>) {
        self.footer_statements.push_front(statement.into());
    }

    /// Take every footer statement as one block, each on its own paragraph.
    pub fn drain_footer_statements(&mut self) -> String {
        let mut block = String::new();
        for statement in self.footer_statements.drain(..) {
            block.push('\n');
            block.push_str(&statement);
            block.push('\n');
        }
        block
    }

    pub fn has_footer_statements(&self) -> bool {
        !self.footer_statements.is_empty()
    }

    /// Alias the global `from` as `to`.
    pub fn add_globals_mapping(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.globals_mapping.insert(from.into(), to.into());
    }

    /// One `var <to> = <from>;` line per mapping.
    pub fn globals_mapping_statements(&self) -> String {
        let mut out = String::new();
        for (from, to) in &self.globals_mapping {
            out.push_str("var ");
            out.push_str(to);
            out.push_str(" = ");
            out.push_str(from);
            out.push_str(";\n");
        }
        out
    }

    pub fn add_global_import(&mut self, name: impl Into<String>) {
        self.global_imports.insert(name.into());
    }

    pub fn is_global_import(&self, name: &str) -> bool {
        self.global_imports.contains(name)
    }

    pub fn add_imported_top_package(&mut self, name: impl Into<String>) {
        self.imported_top_packages.insert(name.into());
    }

    pub fn is_imported_top_package(&self, name: &str) -> bool {
        self.imported_top_packages.contains(name)
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Get statistics about the module graph
    pub fn stats(&self) -> ModuleGraphStats {
        ModuleGraphStats {
            total_modules: self.modules.len(),
            total_edges: self.edge_count,
            total_imported_names: self.modules.iter().map(|m| m.imported_names.len()).sum(),
            total_exports: self.modules.iter().map(|m| m.exported_elements.len()).sum(),
            used_modules: self.used_modules.len(),
            circular_dependencies: self.circular_dependencies.len(),
        }
    }

    /// All modules in creation order
    pub fn modules(&self) -> impl Iterator<Item = &ModuleInfo> {
        self.modules.iter()
    }

    /// Get number of modules
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if graph is empty
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Get circular dependencies found by the last detection
    pub fn circular_deps(&self) -> &[CircularDependency] {
        &self.circular_dependencies
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    New,
    Active,
    Done,
}

/// One module on an explicit DFS work stack.
struct Frame {
    id: ModuleId,
    /// Sorted so traversal order does not depend on hashing
    deps: Vec<ModuleId>,
    next: usize,
}

impl Frame {
    fn new(module: &ModuleInfo) -> Self {
        let mut deps: Vec<ModuleId> = module.dependencies.iter().copied().collect();
        deps.sort();
        Self {
            id: module.id,
            deps,
            next: 0,
        }
    }

    fn advance(&mut self) -> Option<ModuleId> {
        let dep = self.deps.get(self.next).copied()?;
        self.next += 1;
        Some(dep)
    }
}

/// Tarjan's strongly connected components over dense module ids
struct Tarjan {
    index_counter: u32,
    stack: Vec<ModuleId>,
    on_stack: Vec<bool>,
    indices: Vec<Option<u32>>,
    lowlinks: Vec<u32>,
    components: Vec<Vec<ModuleId>>,
}

impl Tarjan {
    fn enter(&mut self, module: &ModuleInfo) -> Frame {
        let vi = module.id.index();
        self.indices[vi] = Some(self.index_counter);
        self.lowlinks[vi] = self.index_counter;
        self.index_counter += 1;
        self.stack.push(module.id);
        self.on_stack[vi] = true;
        Frame::new(module)
    }

    fn strongconnect(&mut self, modules: &[ModuleInfo], root: ModuleId) {
        let mut work = vec![self.enter(&modules[root.index()])];

        while let Some(frame) = work.last_mut() {
            let v = frame.id;
            let vi = v.index();
            if let Some(w) = frame.advance() {
                let wi = w.index();
                match self.indices[wi] {
                    None => {
                        let child = self.enter(&modules[wi]);
                        work.push(child);
                    }
                    Some(w_index) if self.on_stack[wi] => {
                        self.lowlinks[vi] = self.lowlinks[vi].min(w_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            work.pop();
            if let Some(parent) = work.last() {
                let pi = parent.id.index();
                self.lowlinks[pi] = self.lowlinks[pi].min(self.lowlinks[vi]);
            }

            // Root of SCC
            if Some(self.lowlinks[vi]) == self.indices[vi] {
                let mut scc = Vec::new();
                while let Some(w) = self.stack.pop() {
                    self.on_stack[w.index()] = false;
                    scc.push(w);
                    if w == v {
                        break;
                    }
                }
                self.components.push(scc);
            }
        }
    }
}

/// Error returned when topological sort fails due to circular dependency
#[derive(Debug)]
pub struct CircularDependencyError {
    pub cycle: Vec<ModuleId>,
}

impl std::fmt::Display for CircularDependencyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Circular dependency detected involving {} modules",
            self.cycle.len()
        )
    }
}

impl std::error::Error for CircularDependencyError {}

/// Statistics about the module graph
#[derive(Debug, Clone, Default)]
pub struct ModuleGraphStats {
    pub total_modules: usize,
    pub total_edges: usize,
    pub total_imported_names: usize,
    pub total_exports: usize,
    pub used_modules: usize,
    pub circular_dependencies: usize,
}

#[cfg(test)]
#[path = "../tests/module_graph.rs"]
mod tests;
