//! Board representation with incremental group (string) tracking.
//!
//! Each cell holds an optional index into an arena of [`Group`] records.
//! All stones of a connected group point at the same record, so liberty
//! counts are available without a flood fill. The position hash is kept up
//! to date as stones are added and captured.

use std::collections::BTreeSet;
use std::fmt;

use crate::constants::{COLS, MAX_BOARD_SIZE};
use crate::error::GoError;
use crate::types::{Player, Point};
use crate::zobrist;

/// Index of a group record in the board's arena.
type GroupId = usize;

/// A maximal connected set of same-colored stones and its liberties.
///
/// Groups are values: the update methods return a new group rather than
/// modifying the receiver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    color: Player,
    stones: BTreeSet<Point>,
    liberties: BTreeSet<Point>,
}

impl Group {
    pub fn new(
        color: Player,
        stones: impl IntoIterator<Item = Point>,
        liberties: impl IntoIterator<Item = Point>,
    ) -> Self {
        Self {
            color,
            stones: stones.into_iter().collect(),
            liberties: liberties.into_iter().collect(),
        }
    }

    #[inline]
    pub fn color(&self) -> Player {
        self.color
    }

    pub fn stones(&self) -> &BTreeSet<Point> {
        &self.stones
    }

    pub fn liberties(&self) -> &BTreeSet<Point> {
        &self.liberties
    }

    #[inline]
    pub fn num_liberties(&self) -> usize {
        self.liberties.len()
    }

    pub fn without_liberty(&self, point: Point) -> Self {
        let mut liberties = self.liberties.clone();
        liberties.remove(&point);
        Self { color: self.color, stones: self.stones.clone(), liberties }
    }

    pub fn with_liberty(&self, point: Point) -> Self {
        let mut liberties = self.liberties.clone();
        liberties.insert(point);
        Self { color: self.color, stones: self.stones.clone(), liberties }
    }

    /// Combine two same-colored groups joined by a stone.
    pub fn merged_with(&self, other: &Group) -> Self {
        assert_eq!(self.color, other.color, "cannot merge groups of different colors");
        let stones: BTreeSet<Point> = self.stones.union(&other.stones).copied().collect();
        let liberties = self
            .liberties
            .union(&other.liberties)
            .filter(|p| !stones.contains(p))
            .copied()
            .collect();
        Self { color: self.color, stones, liberties }
    }
}

/// A rectangular Go board.
#[derive(Clone, Debug)]
pub struct Board {
    pub num_rows: usize,
    pub num_cols: usize,
    /// Row-major, one entry per point.
    cells: Vec<Option<GroupId>>,
    /// Group records. `None` marks a slot freed by a merge or capture.
    groups: Vec<Option<Group>>,
    free: Vec<GroupId>,
    hash: u64,
}

impl Board {
    /// An empty square board.
    ///
    /// Panics if `size` is outside `1..=MAX_BOARD_SIZE`; use
    /// [`Board::check_size`] to validate untrusted input first.
    pub fn new(size: usize) -> Self {
        Self::with_dimensions(size, size)
    }

    pub fn with_dimensions(num_rows: usize, num_cols: usize) -> Self {
        assert!(
            (1..=MAX_BOARD_SIZE).contains(&num_rows) && (1..=MAX_BOARD_SIZE).contains(&num_cols),
            "board dimensions {num_rows}x{num_cols} out of range"
        );
        Self {
            num_rows,
            num_cols,
            cells: vec![None; num_rows * num_cols],
            groups: Vec::new(),
            free: Vec::new(),
            hash: zobrist::empty_board(),
        }
    }

    /// Validate a board size coming from outside the engine.
    pub fn check_size(size: usize) -> Result<usize, GoError> {
        if (1..=MAX_BOARD_SIZE).contains(&size) {
            Ok(size)
        } else {
            Err(GoError::UnsupportedBoardSize(size))
        }
    }

    #[inline]
    fn idx(&self, point: Point) -> usize {
        (point.row - 1) * self.num_cols + (point.col - 1)
    }

    #[inline]
    pub fn is_on_grid(&self, point: Point) -> bool {
        (1..=self.num_rows).contains(&point.row) && (1..=self.num_cols).contains(&point.col)
    }

    /// All points in row-major order, starting at `(1, 1)`.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (1..=self.num_rows).flat_map(move |row| (1..=self.num_cols).map(move |col| Point::new(row, col)))
    }

    /// On-grid orthogonal neighbours of a point.
    pub fn neighbors(&self, point: Point) -> impl Iterator<Item = Point> + '_ {
        point.neighbors().into_iter().filter(move |&n| self.is_on_grid(n))
    }

    #[inline]
    fn group_id(&self, point: Point) -> Option<GroupId> {
        if !self.is_on_grid(point) {
            return None;
        }
        self.cells[self.idx(point)]
    }

    #[inline]
    fn group(&self, id: GroupId) -> &Group {
        self.groups[id].as_ref().expect("cell refers to a freed group")
    }

    /// Color of the stone at `point`, if any.
    pub fn get(&self, point: Point) -> Option<Player> {
        self.get_group(point).map(Group::color)
    }

    /// The group containing the stone at `point`, if any.
    pub fn get_group(&self, point: Point) -> Option<&Group> {
        self.group_id(point).map(|id| self.group(id))
    }

    /// Current position hash.
    #[inline]
    pub fn zobrist_hash(&self) -> u64 {
        self.hash
    }

    /// Recompute the position hash from the stones on the board.
    pub fn compute_hash(&self) -> u64 {
        self.points()
            .filter_map(|p| self.get(p).map(|c| zobrist::hash_code(p, c)))
            .fold(zobrist::empty_board(), |h, code| h ^ code)
    }

    fn alloc(&mut self, group: Group) -> GroupId {
        match self.free.pop() {
            Some(id) => {
                self.groups[id] = Some(group);
                id
            }
            None => {
                self.groups.push(Some(group));
                self.groups.len() - 1
            }
        }
    }

    fn release(&mut self, id: GroupId) -> Group {
        let group = self.groups[id].take().expect("group released twice");
        self.free.push(id);
        group
    }

    /// Put a stone on the board, merging friendly groups and removing
    /// captured enemy groups.
    ///
    /// Legality is the caller's business: the point must be on the grid and
    /// empty, and suicide is not prevented (the new group may be left with
    /// no liberties).
    pub fn place_stone(&mut self, player: Player, point: Point) {
        assert!(self.is_on_grid(point), "{point} is off the board");
        assert!(self.group_id(point).is_none(), "{point} is already occupied");

        let mut liberties = Vec::with_capacity(4);
        let mut same_color: Vec<GroupId> = Vec::with_capacity(4);
        let mut opposite_color: Vec<GroupId> = Vec::with_capacity(4);

        for neighbor in point.neighbors() {
            if !self.is_on_grid(neighbor) {
                continue;
            }
            match self.group_id(neighbor) {
                None => liberties.push(neighbor),
                Some(id) if self.group(id).color == player => {
                    if !same_color.contains(&id) {
                        same_color.push(id);
                    }
                }
                Some(id) => {
                    if !opposite_color.contains(&id) {
                        opposite_color.push(id);
                    }
                }
            }
        }

        let mut new_group = Group::new(player, [point], liberties);
        for id in same_color {
            let merged = self.release(id);
            new_group = new_group.merged_with(&merged);
        }
        let stones: Vec<Point> = new_group.stones.iter().copied().collect();
        let new_id = self.alloc(new_group);
        for stone in stones {
            let i = self.idx(stone);
            self.cells[i] = Some(new_id);
        }

        self.hash ^= zobrist::hash_code(point, player);

        // Take the liberty from every adjacent enemy group first, then remove
        // the ones left without any.
        let mut captured = Vec::new();
        for id in opposite_color {
            let replacement = self.group(id).without_liberty(point);
            if replacement.num_liberties() == 0 {
                captured.push(id);
            }
            self.groups[id] = Some(replacement);
        }
        for id in captured {
            self.remove_group(id);
        }
    }

    /// Take a group off the board, giving its points back as liberties to
    /// the surrounding groups.
    fn remove_group(&mut self, id: GroupId) {
        let group = self.release(id);
        for &stone in &group.stones {
            let neighbors: Vec<Point> = self.neighbors(stone).collect();
            for neighbor in neighbors {
                match self.group_id(neighbor) {
                    Some(nid) if nid != id => {
                        let updated = self.group(nid).with_liberty(stone);
                        self.groups[nid] = Some(updated);
                    }
                    _ => {}
                }
            }
            let i = self.idx(stone);
            self.cells[i] = None;
            self.hash ^= zobrist::hash_code(stone, group.color);
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (1..=self.num_rows).rev() {
            write!(f, "{row:>2} ")?;
            for col in 1..=self.num_cols {
                let ch = match self.get(Point::new(row, col)) {
                    Some(Player::Black) => 'x',
                    Some(Player::White) => 'o',
                    None => '.',
                };
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for letter in COLS.chars().take(self.num_cols) {
            write!(f, " {letter}")?;
        }
        writeln!(f)
    }
}
