//! Working VHDL designs that the template parameters turn into templates.
//!
//! Each prototype is a complete, self-consistent design unit with concrete
//! default values, so it can be simulated on its own.

/// A sequential fixed-point linear layer reading its weights and bias from
/// two ROM instances `<entity>_w_rom` and `<entity>_b_rom`.
pub const FP_LINEAR: &str = r#"library ieee;
use ieee.std_logic_1164.all;
use ieee.numeric_std.all;

library work;
use work.all;

entity fp_linear_1d is
    generic (
        DATA_WIDTH : integer := 16;
        FRAC_WIDTH : integer := 8;
        X_ADDR_WIDTH : integer := 3;
        Y_ADDR_WIDTH : integer := 2;
        W_ADDR_WIDTH : integer := 5;
        IN_FEATURE_NUM : integer := 6;
        OUT_FEATURE_NUM : integer := 3
    );
    port (
        enable : in std_logic;
        clock : in std_logic;
        x_address : out std_logic_vector(X_ADDR_WIDTH-1 downto 0);
        y_address : in std_logic_vector(Y_ADDR_WIDTH-1 downto 0);
        x : in std_logic_vector(DATA_WIDTH-1 downto 0);
        y : out std_logic_vector(DATA_WIDTH-1 downto 0);
        done : out std_logic
    );
end entity fp_linear_1d;

architecture rtl of fp_linear_1d is
    signal n_clock : std_logic;
    signal w_addr : std_logic_vector(W_ADDR_WIDTH-1 downto 0) := (others => '0');
    signal w_in : std_logic_vector(DATA_WIDTH-1 downto 0);
    signal b_addr : std_logic_vector(Y_ADDR_WIDTH-1 downto 0) := (others => '0');
    signal b_in : std_logic_vector(DATA_WIDTH-1 downto 0);

    type t_y_array is array (0 to OUT_FEATURE_NUM-1) of std_logic_vector(DATA_WIDTH-1 downto 0);
    signal y_ram : t_y_array := (others => (others => '0'));

    function multiply_accumulate(w : in signed(DATA_WIDTH-1 downto 0);
                                 x_in : in signed(DATA_WIDTH-1 downto 0);
                                 acc : in signed(2*DATA_WIDTH-1 downto 0)) return signed is
    begin
        return acc + (w * x_in);
    end function;

    function cut_down(value : in signed(2*DATA_WIDTH-1 downto 0)) return signed is
    begin
        return value(DATA_WIDTH+FRAC_WIDTH-1 downto FRAC_WIDTH);
    end function;
begin
    n_clock <= not clock;

    main : process (clock)
        variable input_idx : integer range 0 to IN_FEATURE_NUM-1 := 0;
        variable output_idx : integer range 0 to OUT_FEATURE_NUM-1 := 0;
        variable acc : signed(2*DATA_WIDTH-1 downto 0) := (others => '0');
        variable finished : std_logic := '0';
    begin
        if rising_edge(clock) then
            if enable = '0' then
                input_idx := 0;
                output_idx := 0;
                acc := (others => '0');
                finished := '0';
            elsif finished = '0' then
                acc := multiply_accumulate(signed(w_in), signed(x), acc);
                if input_idx = IN_FEATURE_NUM-1 then
                    y_ram(output_idx) <= std_logic_vector(cut_down(acc) + signed(b_in));
                    acc := (others => '0');
                    input_idx := 0;
                    if output_idx = OUT_FEATURE_NUM-1 then
                        finished := '1';
                    else
                        output_idx := output_idx + 1;
                    end if;
                else
                    input_idx := input_idx + 1;
                end if;
            end if;
            x_address <= std_logic_vector(to_unsigned(input_idx, X_ADDR_WIDTH));
            w_addr <= std_logic_vector(to_unsigned(output_idx*IN_FEATURE_NUM + input_idx, W_ADDR_WIDTH));
            b_addr <= std_logic_vector(to_unsigned(output_idx, Y_ADDR_WIDTH));
            done <= finished;
        end if;
    end process main;

    y <= y_ram(to_integer(unsigned(y_address)));

    rom_w : entity work.fp_linear_1d_w_rom(rtl)
        port map (
            clk => n_clock,
            en => '1',
            addr => w_addr,
            data => w_in
        );

    rom_b : entity work.fp_linear_1d_b_rom(rtl)
        port map (
            clk => n_clock,
            en => '1',
            addr => b_addr,
            data => b_in
        );
end architecture rtl;"#;

/// A synchronous read-only memory holding `2**ADDR_WIDTH` words.
pub const ROM: &str = r#"library ieee;
use ieee.std_logic_1164.all;
use ieee.numeric_std.all;

entity rom_prototype is
    generic (
        ADDR_WIDTH : integer := 2;
        DATA_WIDTH : integer := 8
    );
    port (
        clk : in std_logic;
        en : in std_logic;
        addr : in std_logic_vector(ADDR_WIDTH-1 downto 0);
        data : out std_logic_vector(DATA_WIDTH-1 downto 0)
    );
end entity rom_prototype;

architecture rtl of rom_prototype is
    type rom_array is array (0 to 2**ADDR_WIDTH-1) of std_logic_vector(DATA_WIDTH-1 downto 0);
    signal ROM : rom_array := ("00000000", "00000001", "00000010", "00000011");
    attribute rom_style : string;
    attribute rom_style of ROM : signal is "auto";
begin
    rom_read : process (clk)
    begin
        if rising_edge(clk) then
            if en = '1' then
                data <= ROM(to_integer(unsigned(addr)));
            end if;
        end if;
    end process rom_read;
end architecture rtl;"#;
