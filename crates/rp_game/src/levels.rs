//! Built-in level table.
//!
//! Legend: `X`/`=` solid block, `t` half-height grass cap, `C` coin, `E` enemy,
//! `M` power-up mushroom, `F` goal flag, anything else is empty space.

pub type LevelTable = &'static [&'static [&'static str]];

pub const LEVELS: LevelTable = &[
    &[
        "                                                                                ",
        "                                                                                ",
        "                                                                                ",
        "                   C                                                            ",
        "        C                                                                       F",
        "    C       E                 C                                                 ",
        "XXXXXXXXXXXX      XXXX     XXXXXXXX      C                     C               ",
        "==========ttttttttttttttttttttttttttttttttttttttttttttttttttttttttttttttttttttt",
    ],
    &[
        "                                                                                ",
        "                                                                                ",
        "        C                               C                                       ",
        "                E                 C                                              ",
        "    XXXXX        XXXXXX      XXXXXXXX              C               F           ",
        "          C               C         E                                     C    ",
        "   C    XXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXX   C                    ",
        "==========ttttttttttttttttttttttttttttttttttttttttttttttttttttttttttttttttttttt",
    ],
    &[
        "                                                                                ",
        "                                                                                ",
        "                   C               E                                            ",
        "        M       XXXX      C      XXXXX       C                          F        ",
        "    C           X  X              X   X                E                 C      ",
        "XXXXXXXXXXXX    X  X    C    C    X   X    C    C    X   X    C    C    XXX    ",
        "==========ttttttttttttttttttttttttttttttttttttttttttttttttttttttttttttttttttttt",
        "                                                                                ",
    ],
];
