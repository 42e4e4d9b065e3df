use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};

/// A graph vertex as handed to the planner: an opaque id plus the real
/// coordinates used for Euclidean costs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub id: usize,
    pub i: f64,
    pub j: f64,
}

#[derive(Debug, Clone)]
pub struct Tile {
    passable: bool,
    pub neighbors: Vec<(usize, usize)>, // Stores coordinates of accessible neighbors
}

impl Tile {
    pub fn is_passable(&self) -> bool {
        self.passable
    }
}

/// Grid map in the MovingAI benchmark format. Cells are vertices with
/// row-major ids; valid moves are the passable 4-connected neighbors.
/// No self-loops: waiting is the planner's business, not the graph's.
#[derive(Debug, Clone)]
pub struct Map {
    pub height: usize,
    pub width: usize,
    pub grid: Vec<Vec<Tile>>,
}

impl Map {
    pub fn from_file(path: &str) -> io::Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_map_str(content: &str) -> io::Result<Self> {
        Self::from_reader(Cursor::new(content))
    }

    fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut lines = reader.lines();

        let _type = lines.next().unwrap()?;
        let height = lines
            .next()
            .unwrap()?
            .split_whitespace()
            .last()
            .unwrap()
            .parse::<usize>()
            .unwrap();
        let width = lines
            .next()
            .unwrap()?
            .split_whitespace()
            .last()
            .unwrap()
            .parse::<usize>()
            .unwrap();
        let _map = lines.next().unwrap()?;

        let mut grid = Vec::with_capacity(height);
        for line in lines.take(height) {
            let row: Vec<char> = line?.chars().collect();
            let tiles_row: Vec<Tile> = row
                .into_iter()
                .map(|ch| Tile {
                    passable: ch == '.',
                    neighbors: Vec::new(),
                })
                .collect();
            grid.push(tiles_row);
        }

        let mut map = Map {
            height,
            width,
            grid,
        };
        map.initialize_neighbors();

        Ok(map)
    }

    fn initialize_neighbors(&mut self) {
        for x in 0..self.height {
            for y in 0..self.width {
                if self.grid[x][y].passable {
                    self.grid[x][y].neighbors = self.get_neighbors(x, y);
                }
            }
        }
    }

    fn get_neighbors(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let directions = [(-1, 0), (1, 0), (0, -1), (0, 1)]; // Up, down, left, right
        let mut neighbors = Vec::new();

        for &(dx, dy) in &directions {
            let new_x = x as i32 + dx;
            let new_y = y as i32 + dy;
            if new_x >= 0
                && new_y >= 0
                && new_x < self.height as i32
                && new_y < self.width as i32
                && self.grid[new_x as usize][new_y as usize].passable
            {
                neighbors.push((new_x as usize, new_y as usize));
            }
        }

        neighbors
    }

    pub fn is_passable(&self, x: usize, y: usize) -> bool {
        self.grid[x][y].is_passable()
    }

    /// Total number of vertices, passable or not. Heuristic tables are
    /// sized by this so ids index them directly.
    pub fn size(&self) -> usize {
        self.height * self.width
    }

    pub fn contains(&self, id: usize) -> bool {
        id < self.size() && self.grid[id / self.width][id % self.width].passable
    }

    pub fn vertex_id(&self, x: usize, y: usize) -> usize {
        x * self.width + y
    }

    pub fn vertex(&self, id: usize) -> Vertex {
        Vertex {
            id,
            i: (id / self.width) as f64,
            j: (id % self.width) as f64,
        }
    }

    /// Spatially adjacent vertices reachable from `id` in a single move.
    pub fn get_valid_moves(&self, id: usize) -> Vec<Vertex> {
        let (x, y) = (id / self.width, id % self.width);
        self.grid[x][y]
            .neighbors
            .iter()
            .map(|&(nx, ny)| Vertex {
                id: self.vertex_id(nx, ny),
                i: nx as f64,
                j: ny as f64,
            })
            .collect()
    }
}
