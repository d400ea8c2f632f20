// A52
// Copyright (c) 2026 The Project A52 Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixed lookup tables of the AC-3 bitstream and decoding process (ATSC A/52).

/// Nominal sample rates indexed by `fscod`.
pub const SAMPLE_RATES: [u32; 3] = [48_000, 44_100, 32_000];

/// Frame size table indexed by `frmsizecod`. Each row is the nominal bit rate (kbit/s) and the
/// frame size in 16-bit words for each `fscod`.
pub const FRAME_SIZE_TABLE: [(u16, [u16; 3]); 38] = [
    ( 32, [  64,   69,   96]),
    ( 32, [  64,   70,   96]),
    ( 40, [  80,   87,  120]),
    ( 40, [  80,   88,  120]),
    ( 48, [  96,  104,  144]),
    ( 48, [  96,  105,  144]),
    ( 56, [ 112,  121,  168]),
    ( 56, [ 112,  122,  168]),
    ( 64, [ 128,  139,  192]),
    ( 64, [ 128,  140,  192]),
    ( 80, [ 160,  174,  240]),
    ( 80, [ 160,  175,  240]),
    ( 96, [ 192,  208,  288]),
    ( 96, [ 192,  209,  288]),
    (112, [ 224,  243,  336]),
    (112, [ 224,  244,  336]),
    (128, [ 256,  278,  384]),
    (128, [ 256,  279,  384]),
    (160, [ 320,  348,  480]),
    (160, [ 320,  349,  480]),
    (192, [ 384,  417,  576]),
    (192, [ 384,  418,  576]),
    (224, [ 448,  487,  672]),
    (224, [ 448,  488,  672]),
    (256, [ 512,  557,  768]),
    (256, [ 512,  558,  768]),
    (320, [ 640,  696,  960]),
    (320, [ 640,  697,  960]),
    (384, [ 768,  835, 1152]),
    (384, [ 768,  836, 1152]),
    (448, [ 896,  975, 1344]),
    (448, [ 896,  976, 1344]),
    (512, [1024, 1114, 1536]),
    (512, [1024, 1115, 1536]),
    (576, [1152, 1253, 1728]),
    (576, [1152, 1254, 1728]),
    (640, [1280, 1393, 1920]),
    (640, [1280, 1394, 1920]),
];

/// Number of full-bandwidth channels indexed by `acmod`.
pub const NFCHANS: [usize; 8] = [2, 1, 2, 3, 3, 4, 4, 5];

/// Maps a transform bin to its bit-allocation band.
pub const MASKTAB: [u8; 253] = [
     0,  1,  2,  3,  4,  5,  6,  7,  8,  9, 10, 11,
    12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23,
    24, 25, 26, 27, 28, 28, 28, 29, 29, 29, 30, 30,
    30, 31, 31, 31, 32, 32, 32, 33, 33, 33, 34, 34,
    34, 35, 35, 35, 35, 35, 35, 36, 36, 36, 36, 36,
    36, 37, 37, 37, 37, 37, 37, 38, 38, 38, 38, 38,
    38, 39, 39, 39, 39, 39, 39, 40, 40, 40, 40, 40,
    40, 41, 41, 41, 41, 41, 41, 41, 41, 41, 41, 41,
    41, 42, 42, 42, 42, 42, 42, 42, 42, 42, 42, 42,
    42, 43, 43, 43, 43, 43, 43, 43, 43, 43, 43, 43,
    43, 44, 44, 44, 44, 44, 44, 44, 44, 44, 44, 44,
    44, 45, 45, 45, 45, 45, 45, 45, 45, 45, 45, 45,
    45, 45, 45, 45, 45, 45, 45, 45, 45, 45, 45, 45,
    45, 46, 46, 46, 46, 46, 46, 46, 46, 46, 46, 46,
    46, 46, 46, 46, 46, 46, 46, 46, 46, 46, 46, 46,
    46, 47, 47, 47, 47, 47, 47, 47, 47, 47, 47, 47,
    47, 47, 47, 47, 47, 47, 47, 47, 47, 47, 47, 47,
    47, 48, 48, 48, 48, 48, 48, 48, 48, 48, 48, 48,
    48, 48, 48, 48, 48, 48, 48, 48, 48, 48, 48, 48,
    48, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49,
    49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49, 49,
    49,
];

/// First bin of each bit-allocation band.
pub const BNDTAB: [u8; 50] = [
      0,   1,   2,   3,   4,   5,   6,   7,   8,   9,
     10,  11,  12,  13,  14,  15,  16,  17,  18,  19,
     20,  21,  22,  23,  24,  25,  26,  27,  28,  31,
     34,  37,  40,  43,  46,  49,  55,  61,  67,  73,
     79,  85,  97, 109, 121, 133, 157, 181, 205, 229,
];

/// Width in bins of each bit-allocation band.
pub const BNDSZ: [u8; 50] = [
     1,  1,  1,  1,  1,  1,  1,  1,  1,  1,
     1,  1,  1,  1,  1,  1,  1,  1,  1,  1,
     1,  1,  1,  1,  1,  1,  1,  1,  3,  3,
     3,  3,  3,  3,  3,  6,  6,  6,  6,  6,
     6, 12, 12, 12, 12, 24, 24, 24, 24, 24,
];

/// Log-addition table.
pub const LATAB: [u16; 256] = [
    0x0040, 0x003f, 0x003e, 0x003d, 0x003c, 0x003b, 0x003a, 0x0039,
    0x0038, 0x0037, 0x0036, 0x0035, 0x0034, 0x0034, 0x0033, 0x0032,
    0x0031, 0x0030, 0x002f, 0x002f, 0x002e, 0x002d, 0x002c, 0x002c,
    0x002b, 0x002a, 0x0029, 0x0029, 0x0028, 0x0027, 0x0026, 0x0026,
    0x0025, 0x0024, 0x0024, 0x0023, 0x0023, 0x0022, 0x0021, 0x0021,
    0x0020, 0x0020, 0x001f, 0x001e, 0x001e, 0x001d, 0x001d, 0x001c,
    0x001c, 0x001b, 0x001b, 0x001a, 0x001a, 0x0019, 0x0019, 0x0018,
    0x0018, 0x0017, 0x0017, 0x0016, 0x0016, 0x0015, 0x0015, 0x0015,
    0x0014, 0x0014, 0x0013, 0x0013, 0x0013, 0x0012, 0x0012, 0x0012,
    0x0011, 0x0011, 0x0011, 0x0010, 0x0010, 0x0010, 0x000f, 0x000f,
    0x000f, 0x000e, 0x000e, 0x000e, 0x000d, 0x000d, 0x000d, 0x000d,
    0x000c, 0x000c, 0x000c, 0x000c, 0x000b, 0x000b, 0x000b, 0x000b,
    0x000a, 0x000a, 0x000a, 0x000a, 0x000a, 0x0009, 0x0009, 0x0009,
    0x0009, 0x0009, 0x0008, 0x0008, 0x0008, 0x0008, 0x0008, 0x0008,
    0x0007, 0x0007, 0x0007, 0x0007, 0x0007, 0x0007, 0x0006, 0x0006,
    0x0006, 0x0006, 0x0006, 0x0006, 0x0006, 0x0006, 0x0005, 0x0005,
    0x0005, 0x0005, 0x0005, 0x0005, 0x0005, 0x0005, 0x0004, 0x0004,
    0x0004, 0x0004, 0x0004, 0x0004, 0x0004, 0x0004, 0x0004, 0x0004,
    0x0004, 0x0003, 0x0003, 0x0003, 0x0003, 0x0003, 0x0003, 0x0003,
    0x0003, 0x0003, 0x0003, 0x0003, 0x0003, 0x0003, 0x0003, 0x0002,
    0x0002, 0x0002, 0x0002, 0x0002, 0x0002, 0x0002, 0x0002, 0x0002,
    0x0002, 0x0002, 0x0002, 0x0002, 0x0002, 0x0002, 0x0002, 0x0002,
    0x0002, 0x0002, 0x0001, 0x0001, 0x0001, 0x0001, 0x0001, 0x0001,
    0x0001, 0x0001, 0x0001, 0x0001, 0x0001, 0x0001, 0x0001, 0x0001,
    0x0001, 0x0001, 0x0001, 0x0001, 0x0001, 0x0001, 0x0001, 0x0001,
    0x0001, 0x0001, 0x0001, 0x0001, 0x0001, 0x0001, 0x0001, 0x0001,
    0x0001, 0x0001, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000,
    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000,
    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000,
    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000,
    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000,
    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000,
];

/// Hearing threshold per bit-allocation band, indexed by `fscod`.
pub const HTH: [[u16; 50]; 3] = [
    [
        0x04d0, 0x04d0, 0x0440, 0x0400, 0x03e0, 0x03c0, 0x03b0, 0x03b0, 0x03a0, 0x03a0,
        0x03a0, 0x03a0, 0x03a0, 0x0390, 0x0390, 0x0390, 0x0380, 0x0380, 0x0370, 0x0370,
        0x0360, 0x0360, 0x0350, 0x0350, 0x0340, 0x0340, 0x0330, 0x0320, 0x0310, 0x0300,
        0x02f0, 0x02f0, 0x02f0, 0x02f0, 0x0300, 0x0310, 0x0340, 0x0390, 0x03e0, 0x0420,
        0x0460, 0x0490, 0x04a0, 0x0460, 0x0440, 0x0440, 0x0520, 0x0800, 0x0840, 0x0840,
    ],
    [
        0x04f0, 0x04f0, 0x0460, 0x0410, 0x03e0, 0x03d0, 0x03c0, 0x03b0, 0x03b0, 0x03a0,
        0x03a0, 0x03a0, 0x03a0, 0x03a0, 0x0390, 0x0390, 0x0390, 0x0380, 0x0380, 0x0380,
        0x0370, 0x0370, 0x0360, 0x0360, 0x0350, 0x0350, 0x0340, 0x0340, 0x0320, 0x0310,
        0x0300, 0x02f0, 0x02f0, 0x02f0, 0x02f0, 0x0300, 0x0320, 0x0350, 0x0390, 0x03e0,
        0x0420, 0x0450, 0x04a0, 0x0490, 0x0460, 0x0440, 0x0480, 0x0630, 0x0840, 0x0840,
    ],
    [
        0x0580, 0x0580, 0x04b0, 0x0450, 0x0420, 0x03f0, 0x03e0, 0x03d0, 0x03c0, 0x03b0,
        0x03b0, 0x03b0, 0x03a0, 0x03a0, 0x03a0, 0x03a0, 0x03a0, 0x03a0, 0x03a0, 0x03a0,
        0x0390, 0x0390, 0x0390, 0x0390, 0x0380, 0x0380, 0x0380, 0x0370, 0x0360, 0x0350,
        0x0340, 0x0330, 0x0320, 0x0310, 0x0300, 0x02f0, 0x02f0, 0x02f0, 0x0300, 0x0310,
        0x0330, 0x0350, 0x03c0, 0x0410, 0x0470, 0x04a0, 0x0460, 0x0440, 0x0450, 0x04e0,
    ],
];

/// Bit-allocation pointer table.
pub const BAPTAB: [u8; 64] = [
     0,  1,  1,  1,  1,  1,  2,  2,  3,  3,  3,  4,  4,  5,  5,  6,
     6,  6,  6,  7,  7,  7,  7,  8,  8,  8,  8,  9,  9,  9,  9, 10,
    10, 10, 10, 11, 11, 11, 11, 12, 12, 12, 12, 13, 13, 13, 13, 14,
    14, 14, 14, 14, 14, 14, 14, 15, 15, 15, 15, 15, 15, 15, 15, 15,
];

/// Slow decay indexed by `sdcycod`.
pub const SDECAY: [i32; 4] = [0x0f, 0x11, 0x13, 0x15];

/// Fast decay indexed by `fdcycod`.
pub const FDECAY: [i32; 4] = [0x3f, 0x53, 0x67, 0x7b];

/// Slow gain indexed by `sgaincod`.
pub const SGAIN: [i32; 4] = [0x540, 0x4d8, 0x478, 0x410];

/// dB per bit indexed by `dbpbcod`.
pub const DBKNEE: [i32; 4] = [0x000, 0x700, 0x900, 0xb00];

/// Masking floor indexed by `floorcod`. The last entry is 0xf800 as a signed 16-bit value.
pub const FLOOR: [i32; 8] = [0x2f0, 0x2b0, 0x270, 0x230, 0x1f0, 0x170, 0x0f0, -0x800];

/// Fast gain indexed by `fgaincod`.
pub const FGAIN: [i32; 8] = [0x080, 0x100, 0x180, 0x200, 0x280, 0x300, 0x380, 0x400];

/// Number of bits of an ungrouped mantissa indexed by bap. Grouped (1, 2, 4) and zero-bit (0)
/// allocations are read by their group code instead.
pub const QNTTZTAB: [u32; 16] = [0, 0, 0, 3, 0, 4, 5, 6, 7, 8, 9, 10, 11, 12, 14, 16];

/// Exponent scale factors, `2^-(14 + exp)`.
pub const SCALE_FACTOR: [f32; 25] = [
    6.103515625e-05, 3.0517578125e-05, 1.52587890625e-05, 7.62939453125e-06,
    3.814697265625e-06, 1.9073486328125e-06, 9.5367431640625e-07, 4.76837158203125e-07,
    2.384185791015625e-07, 1.1920928955078125e-07, 5.960464477539063e-08, 2.9802322387695312e-08,
    1.4901161193847656e-08, 7.450580596923828e-09, 3.725290298461914e-09, 1.862645149230957e-09,
    9.313225746154785e-10, 4.656612873077393e-10, 2.3283064365386963e-10, 1.1641532182693481e-10,
    5.820766091346741e-11, 2.9103830456733704e-11, 1.4551915228366852e-11, 7.275957614183426e-12,
    3.637978807091713e-12,
];

const fn exps_table(div: usize, modulo: usize) -> [i8; 128] {
    let mut table = [0; 128];
    let mut i = 0;

    while i < 128 {
        table[i] = ((i / div) % modulo) as i8 - 2;
        i += 1;
    }

    table
}

/// Exponent deltas of the first, second, and third member of a 7-bit exponent group. Codes
/// above 124 are rejected before lookup.
pub const EXPS_1: [i8; 128] = exps_table(25, 6);
pub const EXPS_2: [i8; 128] = exps_table(5, 5);
pub const EXPS_3: [i8; 128] = exps_table(1, 5);

/// Symmetric quantizer levels, in units of 2^-15, for the 3-, 5-, 7-, 11-, and 15-level
/// mantissa quantizers. Unused code points decode to zero.
pub const Q_1: [f32; 3] = [
    -2.0 * 32768.0 / 3.0, 0.0, 2.0 * 32768.0 / 3.0,
];

pub const Q_2: [f32; 5] = [
    -4.0 * 32768.0 / 5.0, -2.0 * 32768.0 / 5.0, 0.0,
    2.0 * 32768.0 / 5.0, 4.0 * 32768.0 / 5.0,
];

pub const Q_3: [f32; 8] = [
    -6.0 * 32768.0 / 7.0, -4.0 * 32768.0 / 7.0, -2.0 * 32768.0 / 7.0, 0.0,
    2.0 * 32768.0 / 7.0, 4.0 * 32768.0 / 7.0, 6.0 * 32768.0 / 7.0, 0.0,
];

pub const Q_4: [f32; 11] = [
    -10.0 * 32768.0 / 11.0, -8.0 * 32768.0 / 11.0, -6.0 * 32768.0 / 11.0,
    -4.0 * 32768.0 / 11.0, -2.0 * 32768.0 / 11.0, 0.0,
    2.0 * 32768.0 / 11.0, 4.0 * 32768.0 / 11.0, 6.0 * 32768.0 / 11.0,
    8.0 * 32768.0 / 11.0, 10.0 * 32768.0 / 11.0,
];

pub const Q_5: [f32; 16] = [
    -14.0 * 32768.0 / 15.0, -12.0 * 32768.0 / 15.0, -10.0 * 32768.0 / 15.0, -8.0 * 32768.0 / 15.0,
    -6.0 * 32768.0 / 15.0, -4.0 * 32768.0 / 15.0, -2.0 * 32768.0 / 15.0, 0.0,
    2.0 * 32768.0 / 15.0, 4.0 * 32768.0 / 15.0, 6.0 * 32768.0 / 15.0, 8.0 * 32768.0 / 15.0,
    10.0 * 32768.0 / 15.0, 12.0 * 32768.0 / 15.0, 14.0 * 32768.0 / 15.0, 0.0,
];

/// The first half of the 512-point Kaiser-Bessel derived window.
pub const WINDOW: [f32; 256] = [
    0.00014, 0.00024, 0.00037, 0.00051, 0.00067, 0.00086, 0.00107, 0.00130,
    0.00157, 0.00187, 0.00220, 0.00256, 0.00297, 0.00341, 0.00390, 0.00443,
    0.00501, 0.00564, 0.00632, 0.00706, 0.00785, 0.00871, 0.00962, 0.01061,
    0.01166, 0.01279, 0.01399, 0.01526, 0.01662, 0.01806, 0.01959, 0.02121,
    0.02292, 0.02472, 0.02662, 0.02863, 0.03073, 0.03294, 0.03527, 0.03770,
    0.04025, 0.04292, 0.04571, 0.04862, 0.05165, 0.05481, 0.05810, 0.06153,
    0.06508, 0.06878, 0.07261, 0.07658, 0.08069, 0.08495, 0.08935, 0.09389,
    0.09859, 0.10343, 0.10842, 0.11356, 0.11885, 0.12429, 0.12988, 0.13563,
    0.14152, 0.14757, 0.15376, 0.16011, 0.16661, 0.17325, 0.18005, 0.18699,
    0.19407, 0.20130, 0.20867, 0.21618, 0.22382, 0.23161, 0.23952, 0.24757,
    0.25574, 0.26404, 0.27246, 0.28100, 0.28965, 0.29841, 0.30729, 0.31626,
    0.32533, 0.33450, 0.34376, 0.35311, 0.36253, 0.37204, 0.38161, 0.39126,
    0.40096, 0.41072, 0.42054, 0.43040, 0.44030, 0.45023, 0.46020, 0.47019,
    0.48020, 0.49022, 0.50025, 0.51028, 0.52031, 0.53033, 0.54033, 0.55031,
    0.56026, 0.57019, 0.58007, 0.58991, 0.59970, 0.60944, 0.61912, 0.62873,
    0.63827, 0.64774, 0.65713, 0.66643, 0.67564, 0.68476, 0.69377, 0.70269,
    0.71150, 0.72019, 0.72877, 0.73723, 0.74557, 0.75378, 0.76186, 0.76981,
    0.77762, 0.78530, 0.79283, 0.80022, 0.80747, 0.81457, 0.82151, 0.82831,
    0.83496, 0.84145, 0.84779, 0.85398, 0.86001, 0.86588, 0.87160, 0.87716,
    0.88257, 0.88782, 0.89291, 0.89785, 0.90264, 0.90728, 0.91176, 0.91610,
    0.92028, 0.92432, 0.92822, 0.93197, 0.93558, 0.93906, 0.94240, 0.94560,
    0.94867, 0.95162, 0.95444, 0.95713, 0.95971, 0.96217, 0.96451, 0.96674,
    0.96887, 0.97089, 0.97281, 0.97463, 0.97635, 0.97799, 0.97953, 0.98099,
    0.98236, 0.98366, 0.98488, 0.98602, 0.98710, 0.98811, 0.98905, 0.98994,
    0.99076, 0.99153, 0.99225, 0.99291, 0.99353, 0.99411, 0.99464, 0.99513,
    0.99558, 0.99600, 0.99639, 0.99674, 0.99706, 0.99736, 0.99763, 0.99788,
    0.99811, 0.99831, 0.99850, 0.99867, 0.99882, 0.99895, 0.99908, 0.99919,
    0.99929, 0.99938, 0.99946, 0.99953, 0.99959, 0.99965, 0.99969, 0.99974,
    0.99978, 0.99981, 0.99984, 0.99986, 0.99988, 0.99990, 0.99992, 0.99993,
    0.99994, 0.99995, 0.99996, 0.99997, 0.99998, 0.99998, 0.99998, 0.99999,
    0.99999, 0.99999, 0.99999, 1.00000, 1.00000, 1.00000, 1.00000, 1.00000,
    1.00000, 1.00000, 1.00000, 1.00000, 1.00000, 1.00000, 1.00000, 1.00000,
];
