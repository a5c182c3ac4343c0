/*!
(The internal representation of) an atom (aka. a 'variable').

Each atom is a u32 *u* such that either:
- *u* is 0, or:
- *u - 1* is an atom.

```rust
# use coprocessor::structures::atom::Atom;
let m = 97;
let atoms = (0..m).collect::<Vec<Atom>>();
assert_eq!(atoms.len(), 97);
```

That the atoms are [0..*m*) for some *m* allows atoms to index structures such as occurrence counts or the delete timer without a map.

# Notes
- In the SAT literature these are often called 'variables' while in the logic literature these are often called 'atoms'.
*/

/// An atom, aka. a 'variable'.
pub type Atom = u32;

/// The maximum instance of an atom.
///
/// Two literals are indexed per atom, and so the maximum leaves room to double the atom.
pub const ATOM_MAX: Atom = (Atom::MAX >> 1) - 1;
